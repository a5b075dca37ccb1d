// question cards - pull Q/A pairs out of rendered output and save them as csv

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::Error;

/// Where exports land when no file is named.
pub const OUTPUT_DIR: &str = "output";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub question: String,
    pub answer: String,
}

/// Cards are separated by `;`, each one reads `Q: ... A: ...`.
/// Chunks without an answer, or with an empty question, are skipped.
pub fn parse(text: &str) -> Vec<Card> {
    text.split(';')
        .filter_map(|chunk| {
            let (question, answer) = chunk.split_once("A:")?;
            let question = question.trim();
            let question = question.strip_prefix("Q:").unwrap_or(question).trim();
            if question.is_empty() {
                return None;
            }
            Some(Card {
                question: question.to_string(),
                answer: answer.trim().to_string(),
            })
        })
        .collect()
}

/// One `question,answer,tag` row per card, no header.
pub fn to_csv(cards: &[Card], tag: &str) -> Result<String, Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    for card in cards {
        writer.write_record([card.question.as_str(), card.answer.as_str(), tag])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Export(e.to_string()))
}

/// Write `csv` to `<dir>/<YYYY-mm-dd_HH-MM-SS>.csv`, creating `dir` if needed.
pub fn save(dir: &Path, csv: &str) -> Result<PathBuf, Error> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.csv", Local::now().format("%Y-%m-%d_%H-%M-%S")));
    std::fs::write(&path, csv)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_separated_cards() {
        let cards = parse(
            "Q: What is the capital of France?\nA: Paris;\nQ: What is the capital of Germany?\nA: Berlin",
        );
        assert_eq!(
            cards,
            vec![
                Card {
                    question: "What is the capital of France?".into(),
                    answer: "Paris".into(),
                },
                Card {
                    question: "What is the capital of Germany?".into(),
                    answer: "Berlin".into(),
                },
            ]
        );
    }

    #[test]
    fn skips_chunks_without_answer() {
        let cards = parse("intro text; Q: x A: y; A: orphan answer;");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question, "x");
        assert_eq!(cards[0].answer, "y");
    }

    #[test]
    fn quotes_fields_that_need_it() {
        let cards = vec![Card {
            question: "Say \"hi\", then?".into(),
            answer: "line one\nline two".into(),
        }];
        assert_eq!(
            to_csv(&cards, "greetings").unwrap(),
            "\"Say \"\"hi\"\", then?\",\"line one\nline two\",greetings\n"
        );
    }

    #[test]
    fn empty_tag_is_an_empty_column() {
        let cards = parse("Q: a A: b");
        assert_eq!(to_csv(&cards, "").unwrap(), "a,b,\n");
    }

    #[test]
    fn carriage_return_is_quoted() {
        let cards = vec![Card {
            question: "a\rb".into(),
            answer: "x".into(),
        }];
        assert_eq!(to_csv(&cards, "").unwrap(), "\"a\rb\",x,\n");
    }

    #[test]
    fn save_creates_a_timestamped_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(OUTPUT_DIR);

        let path = save(&dir, "a,b,\n").unwrap();

        assert_eq!(path.parent(), Some(dir.as_path()));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with(".csv"));
        assert_eq!(name.len(), "2024-01-02_03-04-05.csv".len());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b,\n");
    }
}
