//! Response Parser — turns a model reply into a `CandidateEvaluation`.
//!
//! Two formats are understood:
//! - `labeled`: `Label: value` pairs, matched case-insensitively anywhere a word
//!   starts, first match wins, value runs to the end of the line. Missing labels
//!   yield empty strings.
//! - `json`: one JSON object, validated strictly. Malformed replies are errors.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::evaluation::{EvaluationOptions, ReplyFormat};
use crate::llm_client::strip_json_fences;
use crate::models::evaluation::CandidateEvaluation;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("reply is not the expected JSON object: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("score '{0}' is not an integer between 1 and 10")]
    InvalidScore(String),

    #[error("reply contains none of the expected labeled fields")]
    NoLabeledFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Email,
    Phone,
    Sex,
    Education,
    Area,
    Score,
    Justification,
}

/// Accepted labels per field, Spanish first. Longer aliases precede their prefixes.
const FIELD_LABELS: &[(Field, &[&str])] = &[
    (Field::Name, &["Nombre completo", "Nombre", "Full name", "Name"]),
    (
        Field::Email,
        &["Correo electrónico", "Correo electronico", "Correo", "E-mail", "Email"],
    ),
    (Field::Phone, &["Teléfono", "Telefono", "Phone"]),
    (Field::Sex, &["Sexo", "Sex"]),
    (
        Field::Education,
        &[
            "Formación académica",
            "Formacion academica",
            "Formación",
            "Formacion",
            "Educación",
            "Educacion",
            "Education",
        ],
    ),
    (
        Field::Area,
        &[
            "Área profesional",
            "Area profesional",
            "Professional area",
            "Área",
            "Area",
        ],
    ),
    (Field::Score, &["Puntuación", "Puntuacion", "Puntaje", "Score"]),
    (
        Field::Justification,
        &["Justificación", "Justificacion", "Justification"],
    ),
];

static FIELD_PATTERNS: Lazy<Vec<(Field, Regex)>> = Lazy::new(|| {
    FIELD_LABELS
        .iter()
        .map(|(field, labels)| {
            let alternatives = labels
                .iter()
                .map(|l| regex::escape(l))
                .collect::<Vec<_>>()
                .join("|");
            // label must start a word; optional bullet / markdown bold around it,
            // value to end of line
            let pattern = format!(
                r"(?im)(?:^|[^\p{{L}}\p{{N}}])[ \t]*(?:[-*•>][ \t]+)?\**[ \t]*(?:{alternatives})[ \t]*\**[ \t]*:[ \t]*\**(.*)$"
            );
            (*field, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// Best-effort parse of a `Label: value` reply. Never fails.
pub fn parse_labeled(reply: &str) -> CandidateEvaluation {
    let mut evaluation = CandidateEvaluation::default();

    for (field, pattern) in FIELD_PATTERNS.iter() {
        let value = pattern
            .captures(reply)
            .and_then(|c| c.get(1))
            .map(|m| clean_value(m.as_str()))
            .unwrap_or_default();

        *slot(&mut evaluation, *field) = value;
    }

    evaluation
}

fn slot(evaluation: &mut CandidateEvaluation, field: Field) -> &mut String {
    match field {
        Field::Name => &mut evaluation.name,
        Field::Email => &mut evaluation.email,
        Field::Phone => &mut evaluation.phone,
        Field::Sex => &mut evaluation.sex,
        Field::Education => &mut evaluation.education,
        Field::Area => &mut evaluation.area,
        Field::Score => &mut evaluation.score,
        Field::Justification => &mut evaluation.justification,
    }
}

fn clean_value(raw: &str) -> String {
    raw.trim().trim_end_matches("**").trim().to_string()
}

#[derive(Debug, Deserialize)]
struct StructuredReply {
    #[serde(default)]
    name: Value,
    #[serde(default)]
    email: Value,
    #[serde(default)]
    phone: Value,
    #[serde(default)]
    sex: Value,
    #[serde(default)]
    education: Value,
    #[serde(default)]
    area: Value,
    score: Value,
    justification: String,
}

/// Strict parse of a JSON reply. `score` and `justification` are required.
pub fn parse_structured(reply: &str) -> Result<CandidateEvaluation, ParseError> {
    let reply: StructuredReply = serde_json::from_str(strip_json_fences(reply))?;

    Ok(CandidateEvaluation {
        name: value_text(&reply.name),
        email: value_text(&reply.email),
        phone: value_text(&reply.phone),
        sex: value_text(&reply.sex),
        education: value_text(&reply.education),
        area: value_text(&reply.area),
        score: normalize_score(&reply.score)?,
        justification: reply.justification.trim().to_string(),
    })
}

/// Parses a reply in the configured format. A labeled reply with no recognizable
/// field at all is reported as unparseable rather than as an empty row.
///
/// `sex` is always empty unless inference is enabled, whatever the model sent.
pub fn parse_reply(
    reply: &str,
    options: &EvaluationOptions,
) -> Result<CandidateEvaluation, ParseError> {
    let mut evaluation = match options.reply_format {
        ReplyFormat::Json => parse_structured(reply)?,
        ReplyFormat::Labeled => parse_labeled(reply),
    };

    if !options.infer_sex {
        evaluation.sex.clear();
    }
    if options.reply_format == ReplyFormat::Labeled && evaluation.is_empty() {
        return Err(ParseError::NoLabeledFields);
    }

    Ok(evaluation)
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Accepts `8`, `8.0`, `"8"` or `"8/10"` and renders `8/10`.
fn normalize_score(value: &Value) -> Result<String, ParseError> {
    let invalid = || ParseError::InvalidScore(value_text(value));

    let score = match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
            .ok_or_else(invalid)?,
        Value::String(s) => {
            let s = s.trim();
            let s = s.strip_suffix("/10").map(str::trim).unwrap_or(s);
            s.parse::<i64>().map_err(|_| invalid())?
        }
        _ => return Err(invalid()),
    };

    if (1..=10).contains(&score) {
        Ok(format!("{score}/10"))
    } else {
        Err(invalid())
    }
}
