//! Body and query extractors that fail with [`AppError`] instead of axum's
//! plain-text rejections.
//!
//! [`AppJson`] keeps decoding after the first bad field: every missing or
//! mistyped field is reported, each with its JSON path, before the handler
//! runs its own `validate_request`.

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use serde_path_to_error::Segment;

use crate::error::{AppError, FieldIssue};

/// Upper bound on decode attempts for one body.
const MAX_PASSES: usize = 64;

pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        decode(body).map(AppJson).map_err(AppError::Validation)
    }
}

pub struct AppQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(AppQuery(params))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Key(String),
    Index(usize),
}

/// Values tried in place of a bad field so decoding can move on to the next one.
fn stand_ins() -> [Value; 5] {
    [json!(0), json!(""), json!(false), json!([]), json!({})]
}

/// Deserialize `body`, collecting one issue per missing or mistyped field.
fn decode<T: DeserializeOwned>(mut body: Value) -> Result<T, Vec<FieldIssue>> {
    let mut issues = Vec::new();
    // Patched locations and the index of the stand-in currently placed there.
    let mut patched: Vec<(Vec<Step>, usize)> = Vec::new();

    for _ in 0..MAX_PASSES {
        let err = match serde_path_to_error::deserialize::<_, T>(&body) {
            Ok(value) if issues.is_empty() => return Ok(value),
            Ok(_) => break,
            Err(err) => err,
        };
        let message = err.inner().to_string();
        let missing = missing_field(&message);

        let Some(mut at) = steps(err.path()) else {
            issues.push(type_issue(err.path().to_string(), &message));
            break;
        };
        if let Some(name) = missing {
            at.push(Step::Key(name.to_owned()));
        }

        // A failure inside a stand-in means the stand-in had the wrong shape.
        let (target, attempt) = match patched.iter_mut().find(|(p, _)| at.starts_with(p)) {
            Some((path, attempt)) => {
                *attempt += 1;
                (path.clone(), *attempt)
            }
            None => {
                let field = render(&at);
                issues.push(match missing {
                    Some(_) => FieldIssue {
                        field,
                        code: "required".into(),
                        message: "is required".into(),
                    },
                    None => type_issue(field, &message),
                });
                patched.push((at.clone(), 0));
                (at, 0)
            }
        };

        let Some(stand_in) = stand_ins().into_iter().nth(attempt) else {
            break;
        };
        if !put(&mut body, &target, stand_in) {
            break;
        }
    }

    issues.sort_by(|a, b| a.field.cmp(&b.field));
    Err(issues)
}

fn type_issue(field: String, message: &str) -> FieldIssue {
    FieldIssue {
        field,
        code: "type".into(),
        message: message.to_owned(),
    }
}

/// `missing field `name`` -> `name`.
fn missing_field(message: &str) -> Option<&str> {
    message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
}

fn steps(path: &serde_path_to_error::Path) -> Option<Vec<Step>> {
    path.iter()
        .map(|segment| match segment {
            Segment::Seq { index } => Some(Step::Index(*index)),
            Segment::Map { key } => Some(Step::Key(key.clone())),
            _ => None,
        })
        .collect()
}

/// Same path format as the validator issues: `contacts[0].name`, `[1].latitude`.
fn render(at: &[Step]) -> String {
    let mut out = String::new();
    for step in at {
        match step {
            Step::Index(i) => out.push_str(&format!("[{i}]")),
            Step::Key(key) if out.is_empty() => out.push_str(key),
            Step::Key(key) => {
                out.push('.');
                out.push_str(key);
            }
        }
    }
    out
}

/// Overwrite (or insert) the value at `at`. Returns `false` when the path
/// does not lead anywhere in `root`.
fn put(root: &mut Value, at: &[Step], value: Value) -> bool {
    let Some((last, parents)) = at.split_last() else {
        return false;
    };

    let mut node = root;
    for step in parents {
        node = match (step, node) {
            (Step::Key(key), Value::Object(map)) => match map.get_mut(key) {
                Some(child) => child,
                None => return false,
            },
            (Step::Index(i), Value::Array(items)) => match items.get_mut(*i) {
                Some(child) => child,
                None => return false,
            },
            _ => return false,
        };
    }

    match (last, node) {
        (Step::Key(key), Value::Object(map)) => {
            map.insert(key.clone(), value);
            true
        }
        (Step::Index(i), Value::Array(items)) if *i < items.len() => {
            items[*i] = value;
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use kindquest_db::models::city::CreateCity;
    use kindquest_db::models::organization::CreateOrganization;

    use super::*;

    fn fields<T: DeserializeOwned + std::fmt::Debug>(body: Value) -> Vec<(String, String)> {
        decode::<T>(body)
            .unwrap_err()
            .into_iter()
            .map(|issue| (issue.field, issue.code))
            .collect()
    }

    #[test]
    fn well_formed_city_decodes() {
        let city: CreateCity = decode(json!({
            "name": "Tolyatti",
            "latitude": 53.5,
            "longitude": 49.4,
            "regionId": 2
        }))
        .unwrap();
        assert_eq!(city.region_id, 2);
    }

    #[test]
    fn every_missing_field_is_listed() {
        assert_eq!(
            fields::<CreateCity>(json!({})),
            vec![
                ("latitude".into(), "required".into()),
                ("longitude".into(), "required".into()),
                ("name".into(), "required".into()),
                ("regionId".into(), "required".into()),
            ]
        );
    }

    #[test]
    fn wrong_types_and_missing_fields_are_reported_together() {
        assert_eq!(
            fields::<CreateCity>(json!({ "name": 5, "latitude": "x", "longitude": 1.0 })),
            vec![
                ("latitude".into(), "type".into()),
                ("name".into(), "type".into()),
                ("regionId".into(), "required".into()),
            ]
        );
    }

    #[test]
    fn batch_paths_start_with_the_item_index() {
        let body = json!([
            { "name": "Samara", "latitude": 53.2, "longitude": 50.1, "regionId": 1 },
            { "name": "Syzran", "latitude": true, "longitude": 48.4, "regionId": 1 }
        ]);
        assert_eq!(
            fields::<Vec<CreateCity>>(body),
            vec![("[1].latitude".into(), "type".into())]
        );
    }

    #[test]
    fn nested_contact_paths_are_kept() {
        let body = json!({
            "name": "Paws",
            "cityId": 1,
            "organizationTypeId": 1,
            "contacts": [{ "name": "phone", "value": "+7" }, { "value": 12 }]
        });
        assert_eq!(
            fields::<CreateOrganization>(body),
            vec![
                ("contacts[1].name".into(), "required".into()),
                ("contacts[1].value".into(), "type".into()),
            ]
        );
    }

    #[test]
    fn non_object_body_is_a_single_issue() {
        let issues = decode::<CreateCity>(json!("Samara")).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "");
    }
}
