//! `{{key}}` placeholder rendering for asset paths.

use effect_core::{PathTemplater, TemplateData, TemplateError};

/// Replaces `{{ key }}` placeholders with values from the template data.
///
/// Whitespace inside the braces is ignored. Every referenced key must exist.
#[derive(Clone, Copy, Debug, Default)]
pub struct BraceTemplater;

impl PathTemplater for BraceTemplater {
    fn render(&self, template: &str, data: &TemplateData) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        let mut consumed = 0;

        while let Some(open) = rest.find("{{") {
            out.push_str(&rest[..open]);
            let after_open = &rest[open + 2..];
            let close = after_open
                .find("}}")
                .ok_or(TemplateError::Unterminated {
                    offset: consumed + open,
                })?;

            let key = after_open[..close].trim();
            let value = data.get(key).ok_or_else(|| TemplateError::UnknownKey {
                key: key.to_owned(),
            })?;
            out.push_str(value);

            let advance = open + 2 + close + 2;
            consumed += advance;
            rest = &rest[advance..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, &str)]) -> TemplateData {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn substitutes_placeholders() {
        let rendered = BraceTemplater
            .render(
                "bolts/{{ color }}/bolt_{{range}}.webm",
                &data(&[("color", "blue"), ("range", "30ft")]),
            )
            .unwrap();
        assert_eq!(rendered, "bolts/blue/bolt_30ft.webm");
    }

    #[test]
    fn literal_paths_pass_through() {
        assert_eq!(
            BraceTemplater.render("plain/path.webm", &data(&[])).unwrap(),
            "plain/path.webm"
        );
    }

    #[test]
    fn unknown_key_fails() {
        assert_eq!(
            BraceTemplater.render("{{missing}}.webm", &data(&[])),
            Err(TemplateError::UnknownKey {
                key: "missing".to_owned()
            })
        );
    }

    #[test]
    fn unterminated_placeholder_reports_offset() {
        assert_eq!(
            BraceTemplater.render("ab{{c", &data(&[("c", "x")])),
            Err(TemplateError::Unterminated { offset: 2 })
        );
    }
}
