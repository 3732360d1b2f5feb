use std::collections::HashMap;
use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequest, Query, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde_json::Value;

use crate::validation::Input;

/// Raw field input of a write request.
///
/// Query-string fields are merged with the body, body fields taking
/// precedence. The body is read as `application/x-www-form-urlencoded` when
/// declared so, and as a JSON object otherwise. A body that does not parse, or
/// JSON that is not an object, contributes nothing; validation then reports the
/// missing fields.
#[derive(Debug, Default)]
pub struct Payload(pub Input);

#[async_trait]
impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut input: Input = Query::<HashMap<String, String>>::try_from_uri(req.uri())
            .map(|Query(q)| strings(q))
            .unwrap_or_default();

        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        let body = if is_form {
            match Form::<HashMap<String, String>>::from_request(req, state).await {
                Ok(Form(fields)) => strings(fields),
                Err(_) => Input::new(),
            }
        } else {
            match Json::<Value>::from_request(req, state).await {
                Ok(Json(Value::Object(map))) => map,
                _ => Input::new(),
            }
        };

        input.extend(body);
        Ok(Payload(input))
    }
}

fn strings(fields: HashMap<String, String>) -> Input {
    fields
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect()
}
