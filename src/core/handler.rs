// the form handler - submit, post, render

use super::client::Client;
use super::diagnostics::Diagnostics;
use super::page::{Document, Element};
use super::query::Query;
use crate::Error;

pub const LOADING_CLASS: &str = "loading";

/// A submit coming from the host. The handler always cancels its default.
#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

// removes the loading class when dropped, so it clears on every exit path
struct Loading<'a>(&'a Element);

impl<'a> Loading<'a> {
    fn start(form: &'a Element) -> Self {
        form.add_class(LOADING_CLASS);
        Self(form)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        self.0.remove_class(LOADING_CLASS);
    }
}

/// Elements are looked up once in [`FormHandler::bind`] and kept as handles.
#[derive(Debug, Clone)]
pub struct FormHandler {
    form: Element,
    input: Element,
    output: Element,
    loading: Element,
    client: Client,
    diagnostics: Diagnostics,
}

impl FormHandler {
    pub fn bind(page: &Document, client: Client, diagnostics: Diagnostics) -> Result<Self, Error> {
        Ok(Self {
            form: page.require("#form")?,
            input: page.require("#input")?,
            output: page.require("#output")?,
            loading: page.require("#loading")?,
            client,
            diagnostics,
        })
    }

    pub fn form(&self) -> &Element {
        &self.form
    }

    pub fn input(&self) -> &Element {
        &self.input
    }

    pub fn output(&self) -> &Element {
        &self.output
    }

    pub fn loading_indicator(&self) -> &Element {
        &self.loading
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn is_loading(&self) -> bool {
        self.form.has_class(LOADING_CLASS)
    }

    /// Handle one submit. Failures end up in the diagnostic log and nowhere
    /// else; the output element is only touched on success.
    pub async fn submit(&self, event: &mut SubmitEvent) {
        event.prevent_default();
        let _loading = Loading::start(&self.form);

        let query = Query::new(self.input.value());
        match self.fetch_output(&query).await {
            Ok(markup) => self.output.set_inner_html(markup),
            Err(e) => self.diagnostics.error(format!("request failed: {e}")),
        }
    }

    async fn fetch_output(&self, query: &Query) -> Result<String, Error> {
        let reply = self.client.send(query).await?;
        reply.output()
    }
}
