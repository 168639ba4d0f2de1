use std::fmt;

/// Ordered collection of error messages gathered across attempts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultiError {
    messages: Vec<String>,
}

impl MultiError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message, keeping insertion order.
    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.messages.iter()
    }

    /// Returns `None` when nothing was recorded.
    pub fn into_option(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.messages.as_slice() {
            [] => f.write_str("no error"),
            [single] => f.write_str(single),
            messages => {
                write!(f, "{} errors occurred:", messages.len())?;
                for message in messages {
                    write!(f, "\n\t* {message}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for MultiError {}

impl<'a> IntoIterator for &'a MultiError {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for MultiError {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::MultiError;

    #[test]
    fn empty_collection_is_none() {
        assert_eq!(MultiError::new().into_option(), None);
    }

    #[test]
    fn single_message_displays_verbatim() {
        let mut errors = MultiError::new();
        errors.push("connection refused");
        assert_eq!(errors.to_string(), "connection refused");
    }

    #[test]
    fn multiple_messages_keep_order() {
        let mut errors = MultiError::new();
        errors.push("first");
        errors.push("second".to_owned());

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.messages(), ["first", "second"]);
        assert_eq!(
            errors.to_string(),
            "2 errors occurred:\n\t* first\n\t* second"
        );
        assert!(errors.clone().into_option().is_some());
    }

    #[test]
    fn iterates_by_reference_and_by_value() {
        let mut errors = MultiError::new();
        errors.push("timeout");
        errors.push("refused");

        let borrowed: Vec<&str> = errors.iter().map(String::as_str).collect();
        assert_eq!(borrowed, ["timeout", "refused"]);

        let mut lengths = Vec::new();
        for message in &errors {
            lengths.push(message.len());
        }
        assert_eq!(lengths, [7, 7]);

        let owned: Vec<String> = errors.into_iter().collect();
        assert_eq!(owned, ["timeout", "refused"]);
    }
}
