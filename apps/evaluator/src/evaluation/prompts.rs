// Evaluation prompt templates.
// All prompts for the evaluation module are defined here.

pub const RECRUITER_SYSTEM: &str = "Eres un experto en selección de personal y reclutamiento.";

pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"El reclutador busca el siguiente perfil:

{profile}

Analiza el siguiente CV. Extrae los datos del candidato y evalúa el CV según ese perfil. Asigna una puntuación del 1 al 10 (donde 10 es perfecto) y justifica brevemente tu calificación.

CV:
"""
{cv_text}
"""

{output_format}"#;

pub const LABELED_OUTPUT_FORMAT: &str = "\
Devuelve el resultado exactamente en este formato, una línea por campo y sin texto adicional:
Nombre: ...
Email: ...
Teléfono: ...
{sex_line}Formación: ...
Área profesional: ...
Puntuación: X/10
Justificación: ...
Si un dato no aparece en el CV, deja el valor vacío.";

pub const LABELED_SEX_LINE: &str = "Sexo: ...\n";

pub const JSON_OUTPUT_FORMAT: &str = r#"Devuelve el resultado como un único objeto JSON con exactamente estas claves:
{
  "name": "string",
  "email": "string",
  "phone": "string",
{sex_key}  "education": "string",
  "area": "string",
  "score": integer del 1 al 10,
  "justification": "string"
}
Si un dato no aparece en el CV, usa una cadena vacía."#;

pub const JSON_SEX_KEY: &str = "  \"sex\": \"string (inferido del CV)\",\n";
