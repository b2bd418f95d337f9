//! Deferred response commit.

use axum::{
    body::Body,
    http::{header, response::Parts, HeaderMap, StatusCode},
    response::Response,
};

/// A downstream response held back until a middleware decides what to send.
///
/// Owned by a single request; nothing reaches the client until
/// [`commit`](Self::commit) hands the response back to the transport.
#[derive(Debug)]
pub struct ResponseBuffer {
    parts: Parts,
    body: Body,
}

impl ResponseBuffer {
    pub fn new(response: Response) -> Self {
        let (parts, body) = response.into_parts();
        Self { parts, body }
    }

    pub fn status(&self) -> StatusCode {
        self.parts.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.parts.headers
    }

    /// Drop the buffered body and turn the response into `204 No Content`.
    ///
    /// Headers describing the dropped representation are removed so the
    /// empty body never disagrees with them.
    pub fn discard_body(&mut self) {
        self.body = Body::empty();
        self.parts.status = StatusCode::NO_CONTENT;
        let headers = &mut self.parts.headers;
        headers.remove(header::CONTENT_LENGTH);
        headers.remove(header::CONTENT_TYPE);
        headers.remove(header::CONTENT_ENCODING);
        headers.remove(header::TRANSFER_ENCODING);
    }

    pub fn commit(self) -> Response {
        Response::from_parts(self.parts, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_commit_without_changes_is_transparent() {
        let mut response = Response::new(Body::from("hello"));
        *response.status_mut() = StatusCode::CREATED;
        response
            .headers_mut()
            .insert("x-custom", HeaderValue::from_static("1"));

        let committed = ResponseBuffer::new(response).commit();
        assert_eq!(committed.status(), StatusCode::CREATED);
        assert_eq!(committed.headers().get("x-custom").unwrap(), "1");
    }

    #[test]
    fn test_discard_strips_representation_headers() {
        let mut response = Response::new(Body::from("hello"));
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("5"));
        headers.insert(header::LINK, HeaderValue::from_static("</a>; rel=self"));

        let mut buffer = ResponseBuffer::new(response);
        buffer.discard_body();
        let committed = buffer.commit();

        assert_eq!(committed.status(), StatusCode::NO_CONTENT);
        assert!(committed.headers().get(header::CONTENT_TYPE).is_none());
        assert!(committed.headers().get(header::CONTENT_LENGTH).is_none());
        assert!(committed.headers().get(header::LINK).is_some());
    }
}
