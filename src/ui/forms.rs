use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use thiserror::Error;

use crate::models::NewArticle;

/// Validation failure for the add-article form. Lists every blank required
/// field in form order.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{} required.", describe_missing(.0))]
pub(crate) struct FormError(pub(crate) Vec<ArticleField>);

fn describe_missing(fields: &[ArticleField]) -> String {
    let names: Vec<&str> = fields.iter().map(|field| field.label()).collect();
    match names.as_slice() {
        [] => "Nothing is".to_string(),
        [only] => format!("{only} is"),
        [rest @ .., last] => format!("{} and {last} are", rest.join(", ")),
    }
}

/// Fields available within the add-article form, in focus order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum ArticleField {
    #[default]
    Title,
    Content,
    Category,
    Tags,
    ImagePath,
}

impl ArticleField {
    pub(crate) const ALL: [ArticleField; 5] = [
        ArticleField::Title,
        ArticleField::Content,
        ArticleField::Category,
        ArticleField::Tags,
        ArticleField::ImagePath,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            ArticleField::Title => "Title",
            ArticleField::Content => "Content",
            ArticleField::Category => "Category",
            ArticleField::Tags => "Tags",
            ArticleField::ImagePath => "Image Path",
        }
    }

    fn required(self) -> bool {
        matches!(
            self,
            ArticleField::Title | ArticleField::Content | ArticleField::Category
        )
    }

    pub(crate) fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or_default()
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Form state for the add-article screen.
#[derive(Default, Clone)]
pub(crate) struct ArticleForm {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) category: String,
    pub(crate) tags: String,
    pub(crate) image_path: String,
    pub(crate) active: ArticleField,
    pub(crate) error: Option<String>,
}

impl ArticleForm {
    pub(crate) fn next_field(&mut self) {
        self.active = self.active.next();
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = self.active.previous();
    }

    fn value(&self, field: ArticleField) -> &String {
        match field {
            ArticleField::Title => &self.title,
            ArticleField::Content => &self.content,
            ArticleField::Category => &self.category,
            ArticleField::Tags => &self.tags,
            ArticleField::ImagePath => &self.image_path,
        }
    }

    fn value_mut(&mut self, field: ArticleField) -> &mut String {
        match field {
            ArticleField::Title => &mut self.title,
            ArticleField::Content => &mut self.content,
            ArticleField::Category => &mut self.category,
            ArticleField::Tags => &mut self.tags,
            ArticleField::ImagePath => &mut self.image_path,
        }
    }

    /// Insert a character into the active field. Control characters are
    /// ignored.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let field = self.active;
        self.value_mut(field).push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        let field = self.active;
        self.value_mut(field).pop();
    }

    /// Replace the image path, typically with the file browser's pick.
    pub(crate) fn set_image_path(&mut self, path: impl Into<String>) {
        self.image_path = path.into();
        self.error = None;
    }

    /// Validate the inputs. Title, content and category must not be blank;
    /// blank tags and image path become `None`. Every other value is passed
    /// through exactly as typed.
    pub(crate) fn parse_inputs(&self) -> Result<NewArticle, FormError> {
        let missing: Vec<ArticleField> = ArticleField::ALL
            .into_iter()
            .filter(|field| field.required() && self.value(*field).trim().is_empty())
            .collect();
        if !missing.is_empty() {
            return Err(FormError(missing));
        }

        let optional =
            |value: &String| (!value.trim().is_empty()).then(|| value.clone());

        Ok(NewArticle {
            title: self.title.clone(),
            content: self.content.clone(),
            category: self.category.clone(),
            tags: optional(&self.tags),
            image_path: optional(&self.image_path),
        })
    }

    /// Render a styled line for the modal form.
    pub(crate) fn build_line(&self, field: ArticleField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            if field.required() {
                "<required>".to_string()
            } else {
                "<optional>".to_string()
            }
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Character length of the requested field, used for cursor placement.
    pub(crate) fn value_len(&self, field: ArticleField) -> usize {
        self.value(field).chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(form: &mut ArticleForm, text: &str) {
        for ch in text.chars() {
            form.push_char(ch);
        }
    }

    #[test]
    fn focus_cycles_through_all_fields() {
        let mut form = ArticleForm::default();
        assert_eq!(form.active, ArticleField::Title);
        for expected in [
            ArticleField::Content,
            ArticleField::Category,
            ArticleField::Tags,
            ArticleField::ImagePath,
            ArticleField::Title,
        ] {
            form.next_field();
            assert_eq!(form.active, expected);
        }
        form.previous_field();
        assert_eq!(form.active, ArticleField::ImagePath);
    }

    #[test]
    fn typing_goes_to_active_field() {
        let mut form = ArticleForm::default();
        type_str(&mut form, "Goblin Campx");
        form.backspace();
        form.next_field();
        type_str(&mut form, "A small raiding outpost.");
        assert!(!form.push_char('\n'));

        assert_eq!(form.title, "Goblin Camp");
        assert_eq!(form.content, "A small raiding outpost.");
        assert_eq!(form.value_len(ArticleField::Title), 11);
    }

    #[test]
    fn parse_inputs_requires_title_content_and_category() {
        let mut form = ArticleForm::default();
        form.content = "text".into();

        let err = form.parse_inputs().unwrap_err();
        assert_eq!(err.0, vec![ArticleField::Title, ArticleField::Category]);
        assert_eq!(err.to_string(), "Title and Category are required.");

        form.title = "   ".into();
        form.category = "Lore".into();
        assert_eq!(form.parse_inputs().unwrap_err().to_string(), "Title is required.");
    }

    #[test]
    fn parse_inputs_keeps_values_and_drops_blank_optionals() {
        let form = ArticleForm {
            title: " Goblin Camp ".into(),
            content: "A small raiding outpost.".into(),
            category: "Location".into(),
            tags: "  ".into(),
            image_path: String::new(),
            ..ArticleForm::default()
        };

        let article = form.parse_inputs().unwrap();
        assert_eq!(article.title, " Goblin Camp ");
        assert_eq!(article.tags, None);
        assert_eq!(article.image_path, None);

        let form = ArticleForm {
            tags: "  encounter, forest  ".into(),
            image_path: "camp .png ".into(),
            ..form
        };
        let article = form.parse_inputs().unwrap();
        assert_eq!(article.tags.as_deref(), Some("  encounter, forest  "));
        assert_eq!(article.image_path.as_deref(), Some("camp .png "));
    }

    #[test]
    fn build_line_shows_placeholders() {
        let form = ArticleForm::default();
        let line = form.build_line(ArticleField::Tags);
        assert_eq!(line.spans[0].content, "Tags: ");
        assert_eq!(line.spans[1].content, "<optional>");

        let line = form.build_line(ArticleField::Title);
        assert_eq!(line.spans[1].content, "<required>");
        assert_eq!(line.spans[1].style.fg, Some(Color::Yellow));
    }
}
