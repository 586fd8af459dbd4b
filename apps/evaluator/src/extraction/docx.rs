//! DOCX extraction using docx-rs.
//!
//! Only top-level body paragraphs are read. Tables, headers, footers and
//! embedded objects are ignored.

use docx_rs::{DocumentChild, Paragraph, ParagraphChild, Run, RunChild};

use super::ExtractError;

/// Joins every body paragraph's text with `\n`, empty paragraphs included.
pub(super) fn extract_text(content: &[u8]) -> Result<String, ExtractError> {
    let docx = docx_rs::read_docx(content)
        .map_err(|e| ExtractError::Docx(format!("Failed to parse DOCX: {e}")))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(p: &Paragraph) -> String {
    let mut text = String::new();

    for child in &p.children {
        match child {
            ParagraphChild::Run(r) => push_run_text(r, &mut text),
            ParagraphChild::Hyperlink(h) => {
                for child in &h.children {
                    if let ParagraphChild::Run(r) = child {
                        push_run_text(r, &mut text);
                    }
                }
            }
            _ => {}
        }
    }

    text
}

fn push_run_text(run: &Run, text: &mut String) {
    for run_child in &run.children {
        match run_child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Table, TableCell, TableRow};
    use std::io::Cursor;

    fn pack(docx: Docx) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        docx.build().pack(&mut buf).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_paragraphs_joined_by_newline() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Ana López")))
                .add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_text("Diseñadora "))
                        .add_run(Run::new().add_text("gráfica")),
                ),
        );

        let text = extract_text(&bytes).unwrap();
        assert_eq!(text, "Ana López\nDiseñadora gráfica");
    }

    #[test]
    fn test_tables_are_not_read() {
        let table = Table::new(vec![TableRow::new(vec![TableCell::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("celda oculta")))])]);
        let bytes = pack(
            Docx::new()
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text("visible")))
                .add_table(table),
        );

        let text = extract_text(&bytes).unwrap();
        assert!(text.contains("visible"));
        assert!(!text.contains("celda oculta"));
    }

    #[test]
    fn test_tabs_and_breaks_are_preserved() {
        let bytes = pack(Docx::new().add_paragraph(
            Paragraph::new().add_run(
                Run::new()
                    .add_text("Figma")
                    .add_tab()
                    .add_text("Sketch")
                    .add_break(docx_rs::BreakType::TextWrapping)
                    .add_text("Illustrator"),
            ),
        ));

        let text = extract_text(&bytes).unwrap();
        assert_eq!(text, "Figma\tSketch\nIllustrator");
    }
}
