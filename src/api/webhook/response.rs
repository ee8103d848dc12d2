// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! TwiML messaging response

/// Builder for a TwiML `<Response>` document
///
/// Twilio reads the webhook response body as TwiML and delivers each
/// `<Message>` element back to the sender. The pipeline produces exactly
/// one reply per turn, so in practice one message is ever added.
#[derive(Debug, Default)]
pub struct MessagingResponse {
    messages: Vec<String>,
}

impl MessagingResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reply message
    pub fn message(mut self, body: &str) -> Self {
        self.messages.push(body.to_string());
        self
    }

    /// Serialize to a TwiML document
    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response>");
        for message in &self.messages {
            xml.push_str("<Message>");
            xml.push_str(&xml_escape(message));
            xml.push_str("</Message>");
        }
        xml.push_str("</Response>");
        xml
    }
}

/// Escape the five XML entities
fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_message() {
        let xml = MessagingResponse::new().message("Hello!").to_xml();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>Hello!</Message></Response>"
        );
    }

    #[test]
    fn test_empty_response() {
        let xml = MessagingResponse::new().to_xml();
        assert_eq!(xml, "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response></Response>");
    }

    #[test]
    fn test_escapes_markup() {
        let xml = MessagingResponse::new().message("a < b & c > d").to_xml();
        assert!(xml.contains("a &lt; b &amp; c &gt; d"));
        assert!(!xml.contains("a < b"));
    }

    #[test]
    fn test_escapes_quotes() {
        let xml = MessagingResponse::new().message("it's \"fine\"").to_xml();
        assert!(xml.contains("it&apos;s &quot;fine&quot;"));
    }

    #[test]
    fn test_preserves_unicode_and_newlines() {
        let xml = MessagingResponse::new()
            .message("🐛 *Results:*\n• Ants")
            .to_xml();
        assert!(xml.contains("🐛 *Results:*\n• Ants"));
    }
}
