//! services/template_service.rs

pub const NAME_PLACEHOLDER: &str = "{name}";
pub const NAME_FALLBACK: &str = "there";

/// Sustituye `{name}` en la plantilla. Otras llaves quedan tal cual.
pub fn render(template: &str, name: Option<&str>) -> String {
    template.replace(NAME_PLACEHOLDER, name.unwrap_or(NAME_FALLBACK))
}
