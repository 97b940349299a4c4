use anyhow::{bail, Context, Result};
use atomic_write_file::AtomicWriteFile;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::io::Write;
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use super::inspector::{FormInspector, OptionRef};
use super::scan;
use crate::config::FormConfig;
use crate::distribution::Score;

static INPUT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("input").expect("input selector is valid"));

/// One `<input type="radio">` belonging to a question group.
#[derive(Debug, Clone)]
struct RadioInput {
    /// Byte range of the whole tag in the source document.
    span: Range<usize>,
    /// Byte ranges of `checked` attributes, relative to the tag start.
    checked_spans: Vec<Range<usize>>,
    id: Option<String>,
}

impl RadioInput {
    fn originally_checked(&self) -> bool {
        !self.checked_spans.is_empty()
    }

    /// Rebuild the tag text with or without the `checked` attribute.
    fn rewrite(&self, tag: &str, checked: bool) -> String {
        let mut out = tag.to_string();
        for span in self.checked_spans.iter().rev() {
            let start = out[..span.start].trim_end().len();
            out.replace_range(start..span.end, "");
        }

        if checked {
            let mut close = out.len() - 1;
            if out[..close].ends_with('/') {
                close -= 1;
            }
            let body_end = out[..close].trim_end().len();
            out.insert_str(body_end, " checked");
        }

        out
    }
}

/// A saved survey page whose radio buttons can be inspected and re-checked.
///
/// Only radio inputs whose `name` starts with the configured question prefix count.
/// Rendering keeps every byte outside the touched `<input>` tags intact.
#[derive(Debug, Clone)]
pub struct HtmlForm {
    source: String,
    prefix: String,
    scale_size: usize,
    radios: Vec<RadioInput>,
    by_id: HashMap<String, usize>,
    selected: Vec<bool>,
}

impl HtmlForm {
    pub fn parse(source: impl Into<String>, config: &FormConfig) -> Result<Self> {
        let source = source.into();

        let spans = scan::input_tags(&source);
        let parsed = Html::parse_document(&source).select(&INPUT).count();
        if spans.len() != parsed {
            bail!(
                "Located {} <input> tags but the HTML parser found {}",
                spans.len(),
                parsed
            );
        }

        let radios: Vec<RadioInput> = spans
            .into_iter()
            .filter_map(|span| parse_radio(&source, span, &config.question_prefix))
            .collect();

        let mut by_id = HashMap::new();
        for (index, radio) in radios.iter().enumerate() {
            if let Some(id) = &radio.id {
                by_id.entry(id.clone()).or_insert(index);
            }
        }

        let selected = radios.iter().map(RadioInput::originally_checked).collect();

        let form = Self {
            source,
            prefix: config.question_prefix.clone(),
            scale_size: config.scale_size,
            radios,
            by_id,
            selected,
        };

        let leftover = form.radios.len() % form.scale_size.max(1);
        if leftover != 0 {
            tracing::warn!(
                radios = form.radios.len(),
                scale_size = form.scale_size,
                "radio count is not a multiple of the scale size; ignoring {} trailing options",
                leftover
            );
        }
        tracing::debug!(
            radios = form.radios.len(),
            questions = form.question_count(),
            "parsed survey form"
        );

        Ok(form)
    }

    /// Read and parse a saved survey page.
    pub fn load(path: &Path, config: &FormConfig) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read survey page at {}", path.display()))?;
        Self::parse(source, config)
            .with_context(|| format!("Failed to parse survey page at {}", path.display()))
    }

    /// Write the rendered page atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut file = AtomicWriteFile::open(path)
            .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
        file.write_all(self.render().as_bytes())
            .with_context(|| format!("Failed to write survey page to {}", path.display()))?;
        file.commit()
            .with_context(|| format!("Failed to save survey page to {}", path.display()))?;
        Ok(())
    }

    /// Number of radio inputs that belong to question groups.
    pub fn radio_count(&self) -> usize {
        self.radios.len()
    }

    /// Ids of the currently selected radios, in document order.
    pub fn selected_ids(&self) -> Vec<&str> {
        self.radios
            .iter()
            .zip(&self.selected)
            .filter(|(_, selected)| **selected)
            .filter_map(|(radio, _)| radio.id.as_deref())
            .collect()
    }

    /// The document with the current selections applied.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.source.len() + self.radios.len() * 8);
        let mut cursor = 0;

        for (radio, &selected) in self.radios.iter().zip(&self.selected) {
            if selected == radio.originally_checked() {
                continue;
            }
            out.push_str(&self.source[cursor..radio.span.start]);
            out.push_str(&radio.rewrite(&self.source[radio.span.clone()], selected));
            cursor = radio.span.end;
        }

        out.push_str(&self.source[cursor..]);
        out
    }
}

impl FormInspector for HtmlForm {
    fn question_count(&self) -> usize {
        if self.scale_size == 0 {
            return 0;
        }
        self.radios.len() / self.scale_size
    }

    fn find_option(&self, question: usize, score: Score) -> Option<OptionRef> {
        self.by_id
            .get(&self.option_label(question, score))
            .map(|&index| OptionRef(index))
    }

    fn option_label(&self, question: usize, score: Score) -> String {
        format!("{}{}{}", self.prefix, question, score)
    }

    fn clear_selections(&mut self) {
        self.selected.iter_mut().for_each(|s| *s = false);
    }

    fn select(&mut self, option: OptionRef) {
        if let Some(slot) = self.selected.get_mut(option.0) {
            *slot = true;
        }
    }
}

/// Interpret one located `<input>` tag; `None` unless it is a radio of a question group.
fn parse_radio(source: &str, span: Range<usize>, prefix: &str) -> Option<RadioInput> {
    let tag = &source[span.clone()];
    let fragment = Html::parse_fragment(tag);
    let input = fragment.select(&INPUT).next()?.value();

    let is_radio = input
        .attr("type")
        .is_some_and(|t| t.trim().eq_ignore_ascii_case("radio"));
    let in_group = input.attr("name").is_some_and(|n| n.starts_with(prefix));
    if !is_radio || !in_group {
        return None;
    }

    Some(RadioInput {
        checked_spans: scan::checked_spans(tag),
        id: input.attr("id").map(str::to_string),
        span,
    })
}

/// Build a minimal survey page with `questions` groups of `scale` radios each.
#[cfg(test)]
pub(crate) fn survey_page(questions: usize, scale: usize) -> String {
    let mut html = String::from("<html><body><form id=\"survey\">\n");
    for q in 1..=questions {
        html.push_str(&format!("  <p>Question {}</p>\n", q));
        for s in 1..=scale {
            html.push_str(&format!(
                "  <input type=\"radio\" name=\"q{q}\" id=\"q{q}{s}\" value=\"{s}\">\n"
            ));
        }
    }
    html.push_str("  <input type=\"text\" name=\"comments\">\n</form></body></html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(v: u8) -> Score {
        Score::new(v).unwrap()
    }

    #[test]
    fn test_counts_question_groups() {
        let form = HtmlForm::parse(survey_page(7, 5), &FormConfig::default()).unwrap();
        assert_eq!(form.radio_count(), 35);
        assert_eq!(form.question_count(), 7);
    }

    #[test]
    fn test_ignores_non_question_inputs() {
        let html = r#"
            <input type="radio" name="gender" id="q11">
            <input type="checkbox" name="q1" id="q12">
            <input type="radio" name="q1" id="q13">
        "#;
        let form = HtmlForm::parse(html, &FormConfig::default()).unwrap();
        assert_eq!(form.radio_count(), 1);
        assert!(form.find_option(1, score(3)).is_some());
        assert!(form.find_option(1, score(1)).is_none());
    }

    #[test]
    fn test_trailing_options_do_not_form_a_question() {
        let mut html = survey_page(2, 5);
        html.push_str(r#"<input type="radio" name="q3" id="q31">"#);
        let form = HtmlForm::parse(html, &FormConfig::default()).unwrap();
        assert_eq!(form.question_count(), 2);
    }

    #[test]
    fn test_attribute_variants() {
        let html = concat!(
            r#"<INPUT Type=RADIO name='q1' ID=q14 checked/>"#,
            r#"<input type="radio" name="q1" id="q15" />"#,
        );
        let form = HtmlForm::parse(html, &FormConfig::default()).unwrap();
        assert_eq!(form.radio_count(), 2);
        assert_eq!(form.selected_ids(), vec!["q14"]);
        assert_eq!(form.find_option(1, score(5)), Some(OptionRef(1)));
    }

    #[test]
    fn test_quoted_gt_in_attribute_value() {
        let html = concat!(
            r#"<input type="radio" title="a>b" name="q1" id="q11" checked>"#,
            r#"<input type="radio" name="q1" id="q12">"#,
        );
        let config = FormConfig {
            scale_size: 2,
            ..FormConfig::default()
        };
        let mut form = HtmlForm::parse(html, &config).unwrap();
        assert_eq!(form.radio_count(), 2);
        assert_eq!(form.question_count(), 1);
        assert_eq!(form.selected_ids(), vec!["q11"]);
        assert_eq!(form.render(), html);

        form.clear_selections();
        let option = form.find_option(1, score(2)).unwrap();
        form.select(option);
        assert_eq!(
            form.render(),
            concat!(
                r#"<input type="radio" title="a>b" name="q1" id="q11">"#,
                r#"<input type="radio" name="q1" id="q12" checked>"#,
            )
        );
    }

    #[test]
    fn test_commented_out_radios_are_ignored() {
        let mut html = survey_page(2, 5);
        html.push_str("<!--\n");
        for s in 1..=5 {
            html.push_str(&format!(
                "  <input type=\"radio\" name=\"q9\" id=\"q9{s}\" value=\"{s}\">\n"
            ));
        }
        html.push_str("-->\n");

        let form = HtmlForm::parse(html.clone(), &FormConfig::default()).unwrap();
        assert_eq!(form.radio_count(), 10);
        assert_eq!(form.question_count(), 2);
        assert!(form.find_option(9, score(1)).is_none());
        assert_eq!(form.render(), html);
    }

    #[test]
    fn test_radios_inside_script_are_ignored() {
        let html = format!(
            "{}<script>document.write('{}');</script>",
            survey_page(1, 5),
            r#"<input type="radio" name="q3" id="q31" checked>"#
        );
        let mut form = HtmlForm::parse(html.clone(), &FormConfig::default()).unwrap();
        assert_eq!(form.radio_count(), 5);
        assert!(form.selected_ids().is_empty());

        let option = form.find_option(1, score(3)).unwrap();
        form.select(option);
        assert!(form.render().ends_with("id=\"q31\" checked>');</script>"));
    }

    #[test]
    fn test_unchanged_form_renders_identically() {
        let mut html = survey_page(3, 5);
        html = html.replace(r#"id="q23" value="3">"#, r#"id="q23" value="3" checked>"#);
        let form = HtmlForm::parse(html.clone(), &FormConfig::default()).unwrap();
        assert_eq!(form.selected_ids(), vec!["q23"]);
        assert_eq!(form.render(), html);
    }

    #[test]
    fn test_select_and_clear() {
        let html = concat!(
            r#"<input type="radio" name="q1" id="q11" checked="checked">"#,
            r#"<input type="radio" name="q1" id="q12" />"#,
        );
        let mut form = HtmlForm::parse(html, &FormConfig::default()).unwrap();

        form.clear_selections();
        let option = form.find_option(1, score(2)).unwrap();
        form.select(option);

        assert_eq!(form.selected_ids(), vec!["q12"]);
        assert_eq!(
            form.render(),
            concat!(
                r#"<input type="radio" name="q1" id="q11">"#,
                r#"<input type="radio" name="q1" id="q12" checked />"#,
            )
        );
    }

    #[test]
    fn test_custom_prefix() {
        let html = r#"<input type="radio" name="item1" id="item13">"#;
        let config = FormConfig {
            question_prefix: "item".to_string(),
            scale_size: 1,
        };
        let form = HtmlForm::parse(html, &config).unwrap();
        assert_eq!(form.question_count(), 1);
        assert_eq!(form.option_label(1, score(3)), "item13");
        assert_eq!(form.find_option(1, score(3)), Some(OptionRef(0)));
    }

    #[test]
    fn test_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("survey.html");
        let output = dir.path().join("filled.html");
        std::fs::write(&input, survey_page(1, 5)).unwrap();

        let mut form = HtmlForm::load(&input, &FormConfig::default()).unwrap();
        let option = form.find_option(1, score(4)).unwrap();
        form.select(option);
        form.save(&output).unwrap();

        let reloaded = HtmlForm::load(&output, &FormConfig::default()).unwrap();
        assert_eq!(reloaded.selected_ids(), vec!["q14"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = HtmlForm::load(&dir.path().join("nope.html"), &FormConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read survey page"));
    }
}
