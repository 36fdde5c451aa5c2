//! Request bodies and headers for the dashboard endpoints.

/// Header marking the request as an in-page (XHR-style) call.
pub const REQUESTED_WITH_HEADER: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");
/// Form content type shared by every POST.
pub const CONTENT_TYPE_HEADER: (&str, &str) = ("Content-Type", "application/x-www-form-urlencoded");

/// A POST against a widget's `data-path` endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostRequest {
    path: String,
    body: String,
}

impl PostRequest {
    /// Persist a slider value as `value=<integer>`.
    #[must_use]
    pub fn slider(path: impl Into<String>, value: u32) -> Self {
        Self {
            path: path.into(),
            body: format!("value={value}"),
        }
    }

    /// Submit starter text exactly as typed.
    #[must_use]
    pub fn starter(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            body: text.into(),
        }
    }

    /// Endpoint path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Encoded body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Headers sent with every POST.
    #[must_use]
    pub const fn headers(&self) -> [(&'static str, &'static str); 2] {
        [REQUESTED_WITH_HEADER, CONTENT_TYPE_HEADER]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_posts_are_form_encoded_integers() {
        let request = PostRequest::slider("/simulated-hospital/rate", 120);
        assert_eq!(request.path(), "/simulated-hospital/rate");
        assert_eq!(request.body(), "value=120");
    }

    #[test]
    fn starter_posts_keep_text_verbatim() {
        let text = "aki_scenario_1: Tina Turner\nfoo=bar&baz";
        let request = PostRequest::starter("/simulated-hospital/start", text);
        assert_eq!(request.body(), text);
        assert_eq!(PostRequest::starter("/p", "foo").body(), "foo");
    }

    #[test]
    fn both_kinds_share_the_contract_headers() {
        let expected = [
            ("X-Requested-With", "XMLHttpRequest"),
            ("Content-Type", "application/x-www-form-urlencoded"),
        ];
        assert_eq!(PostRequest::slider("/p", 1).headers(), expected);
        assert_eq!(PostRequest::starter("/p", "x").headers(), expected);
    }
}
