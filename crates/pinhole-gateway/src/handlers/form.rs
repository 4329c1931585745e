use axum::extract::{Form, FromRequest, Multipart, Query, Request};
use axum::http::header;
use std::convert::Infallible;
use tracing::debug;

const URL_FIELD: &str = "url";

type Pairs = Vec<(String, String)>;

/// The `url` value of a shorten request.
///
/// Read from a urlencoded or multipart body first, then from the query
/// string. A repeated field resolves to its first occurrence. Unreadable
/// bodies and empty values count as absent.
#[derive(Debug, Default)]
pub struct UrlField(pub Option<String>);

impl<S: Send + Sync> FromRequest<S> for UrlField {
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let from_query = Query::<Pairs>::try_from_uri(req.uri())
            .ok()
            .and_then(|Query(pairs)| first_url(pairs));

        let from_body = if is_multipart(&req) {
            match Multipart::from_request(req, state).await {
                Ok(multipart) => read_multipart(multipart).await,
                Err(e) => {
                    debug!(error = %e, "unreadable multipart body");
                    None
                }
            }
        } else {
            match Form::<Pairs>::from_request(req, state).await {
                Ok(Form(pairs)) => first_url(pairs),
                Err(e) => {
                    debug!(error = %e, "no urlencoded body");
                    None
                }
            }
        };

        Ok(Self(non_empty(from_body).or_else(|| non_empty(from_query))))
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

fn first_url(pairs: Pairs) -> Option<String> {
    pairs
        .into_iter()
        .find(|(key, _)| key == URL_FIELD)
        .map(|(_, value)| value)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

async fn read_multipart(mut multipart: Multipart) -> Option<String> {
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(URL_FIELD) => return field.text().await.ok(),
            Ok(Some(_)) => continue,
            Ok(None) => return None,
            Err(e) => {
                debug!(error = %e, "malformed multipart field");
                return None;
            }
        }
    }
}
