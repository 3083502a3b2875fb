//! Request validation.
//!
//! Handlers call [`validate_request`] (or [`validate_batch`] for array
//! bodies) before anything else. Every failed rule is reported, each with
//! the camelCase JSON path of the offending field.

use std::borrow::Cow;
use std::collections::HashMap;

use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::{AppError, FieldIssue};

/// Validate one request body.
pub fn validate_request<T: Validate>(input: &T) -> Result<(), AppError> {
    match input.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let mut issues = Vec::new();
            collect("", &errors, &mut issues);
            issues.sort_by(|a, b| a.field.cmp(&b.field));
            Err(AppError::Validation(issues))
        }
    }
}

/// Validate every element of an array body. Paths are prefixed with the
/// element index (`[3].name`).
pub fn validate_batch<T: Validate>(items: &[T]) -> Result<(), AppError> {
    let mut issues = Vec::new();
    for (i, item) in items.iter().enumerate() {
        if let Err(errors) = item.validate() {
            let mut item_issues = Vec::new();
            collect(&format!("[{i}]"), &errors, &mut item_issues);
            item_issues.sort_by(|a, b| a.field.cmp(&b.field));
            issues.extend(item_issues);
        }
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(issues))
    }
}

fn collect(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldIssue>) {
    for (field, kind) in errors.errors() {
        let path = join(prefix, &camel_case(field));
        match kind {
            ValidationErrorsKind::Field(list) => {
                out.extend(list.iter().map(|e| FieldIssue {
                    field: path.clone(),
                    code: e.code.to_string(),
                    message: describe(e),
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(&format!("{path}[{index}]"), nested, out);
                }
            }
        }
    }
}

fn join(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

/// `organization_type_id` -> `organizationTypeId`.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    let param = |name: &str| param_text(&error.params, name);
    match error.code.as_ref() {
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("length must be between {min} and {max}"),
            (Some(min), None) => format!("length must be at least {min}"),
            (None, Some(max)) => format!("length must be at most {max}"),
            (None, None) => "has an invalid length".to_string(),
        },
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("must be between {min} and {max}"),
            (Some(min), None) => format!("must be at least {min}"),
            (None, Some(max)) => format!("must be at most {max}"),
            (None, None) => "is out of range".to_string(),
        },
        "email" => "must be a valid email address".to_string(),
        other => format!("failed '{other}' check"),
    }
}

fn param_text(params: &HashMap<Cow<'static, str>, serde_json::Value>, name: &str) -> Option<String> {
    params.get(name).map(|v| match v {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use kindquest_db::models::city::CreateCity;
    use kindquest_db::models::organization::{Contact, CreateOrganization};

    use super::*;

    fn organization(contacts: Vec<Contact>) -> CreateOrganization {
        CreateOrganization {
            name: "Shelter".into(),
            city_id: 1,
            organization_type_id: 1,
            latitude: None,
            longitude: None,
            summary: String::new(),
            mission: String::new(),
            description: String::new(),
            goals: vec![],
            needs: vec![],
            address: String::new(),
            contacts,
            help_type_ids: vec![],
        }
    }

    fn issues(err: AppError) -> Vec<FieldIssue> {
        match err {
            AppError::Validation(issues) => issues,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn nested_list_paths_are_indexed() {
        let org = organization(vec![
            Contact {
                name: "phone".into(),
                value: "+1".into(),
            },
            Contact {
                name: String::new(),
                value: "x".into(),
            },
        ]);

        let found = issues(validate_request(&org).unwrap_err());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].field, "contacts[1].name");
        assert_eq!(found[0].code, "length");
    }

    #[test]
    fn every_failed_field_is_reported_in_camel_case() {
        let city = CreateCity {
            name: String::new(),
            latitude: 91.0,
            longitude: -181.0,
            region_id: 1,
        };

        let fields: Vec<String> = issues(validate_request(&city).unwrap_err())
            .into_iter()
            .map(|i| i.field)
            .collect();
        assert_eq!(fields, vec!["latitude", "longitude", "name"]);
    }

    #[test]
    fn batch_prefixes_item_index() {
        let good = CreateCity {
            name: "Ok".into(),
            latitude: 0.0,
            longitude: 0.0,
            region_id: 1,
        };
        let bad = CreateCity {
            latitude: 120.0,
            ..good.clone()
        };

        let found = issues(validate_batch(&[good, bad]).unwrap_err());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].field, "[1].latitude");
        assert_eq!(found[0].code, "range");
    }

    #[test]
    fn valid_input_passes() {
        assert!(validate_request(&organization(vec![])).is_ok());
    }

    #[test]
    fn camel_case_conversion() {
        assert_eq!(camel_case("organization_type_id"), "organizationTypeId");
        assert_eq!(camel_case("name"), "name");
    }
}
