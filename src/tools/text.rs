use crate::element::ElementId;

/// Inline editing of a freshly placed (or selected) text element.
///
/// While `all_selected` is set the next keystrokes replace the whole
/// content; afterwards they append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEditSession {
    pub id: ElementId,
    pub all_selected: bool,
}

impl TextEditSession {
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            all_selected: true,
        }
    }

    /// Content after typing `input` into `content`.
    pub fn apply(&mut self, content: &str, input: &str) -> String {
        if std::mem::take(&mut self.all_selected) {
            input.to_owned()
        } else {
            format!("{content}{input}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_input_replaces_the_placeholder() {
        let mut session = TextEditSession::new(ElementId::new());
        let content = session.apply("Type here", "Hel");
        let content = session.apply(&content, "lo");
        assert_eq!(content, "Hello");
        assert!(!session.all_selected);
    }
}
