//! Schema.org JSON-LD generation and validation.
//!
//! The per-`@type` rule table in this module is the single source of truth for
//! structured-data requirements. Both the scoring analyzer and the standalone
//! validator evaluate it, so the two can never disagree about what a valid
//! Product, Organization or FAQPage looks like.

use crate::models::{Check, Priority, Severity, ValidationReport};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;

pub const SCHEMA_CONTEXT: &str = "https://schema.org";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    #[default]
    InStock,
    OutOfStock,
    PreOrder,
    Discontinued,
    LimitedAvailability,
}

impl Availability {
    pub fn as_url(&self) -> String {
        format!("{}/{}", SCHEMA_CONTEXT, self)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Availability::InStock => "InStock",
            Availability::OutOfStock => "OutOfStock",
            Availability::PreOrder => "PreOrder",
            Availability::Discontinued => "Discontinued",
            Availability::LimitedAvailability => "LimitedAvailability",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSchemaInput {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    pub price: f64,
    pub currency: String,
    #[serde(default)]
    pub availability: Availability,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSchemaInput {
    pub name: String,
    pub url: String,
    pub logo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqSchemaInput {
    pub questions: Vec<FaqItem>,
}

pub fn generate_product_schema(input: &ProductSchemaInput) -> Value {
    let mut schema = Map::new();
    schema.insert("@context".into(), json!(SCHEMA_CONTEXT));
    schema.insert("@type".into(), json!("Product"));
    schema.insert("name".into(), json!(input.name));
    schema.insert("description".into(), json!(input.description));
    if let Some(image) = &input.image {
        schema.insert("image".into(), json!(image));
    }
    schema.insert(
        "offers".into(),
        json!({
            "@type": "Offer",
            "price": input.price,
            "priceCurrency": input.currency,
            "availability": input.availability.as_url(),
        }),
    );
    Value::Object(schema)
}

pub fn generate_organization_schema(input: &OrganizationSchemaInput) -> Value {
    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "Organization",
        "name": input.name,
        "url": input.url,
        "logo": input.logo,
    })
}

pub fn generate_faq_schema(input: &FaqSchemaInput) -> Value {
    let main_entity: Vec<Value> = input
        .questions
        .iter()
        .map(|item| {
            json!({
                "@type": "Question",
                "name": item.question,
                "acceptedAnswer": {
                    "@type": "Answer",
                    "text": item.answer,
                },
            })
        })
        .collect();

    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "FAQPage",
        "mainEntity": main_entity,
    })
}

/// Wraps a schema in a `<script type="application/ld+json">` tag ready to paste into a page head
pub fn schema_to_script_tag(schema: &Value) -> String {
    // A literal "</" inside a string would close the script element early
    let body = format!("{:#}", schema).replace("</", "<\\/");
    format!("<script type=\"application/ld+json\">\n{}\n</script>", body)
}

/// What happens when a field rule is not satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Reported as an issue
    Required {
        severity: Severity,
        message: &'static str,
        fix: &'static str,
    },
    /// Reported as a suggestion
    Recommended {
        priority: Priority,
        message: &'static str,
        impact: &'static str,
    },
}

impl Requirement {
    pub fn message(&self) -> &'static str {
        match self {
            Requirement::Required { message, .. } | Requirement::Recommended { message, .. } => {
                *message
            }
        }
    }
}

/// A field requirement; satisfied when any of `fields` is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub fields: &'static [&'static str],
    pub requirement: Requirement,
    /// The scored check this rule feeds, if any
    pub check: Option<Check>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaRule {
    pub schema_type: &'static str,
    pub fields: &'static [FieldRule],
}

pub static SCHEMA_RULES: &[SchemaRule] = &[
    SchemaRule {
        schema_type: "Product",
        fields: &[
            FieldRule {
                fields: &["name"],
                requirement: Requirement::Required {
                    severity: Severity::Warning,
                    message: "Product schema is missing the \"name\" property",
                    fix: "Add a \"name\" property containing the product name",
                },
                check: Some(Check::ProductName),
            },
            FieldRule {
                fields: &["offers"],
                requirement: Requirement::Recommended {
                    priority: Priority::High,
                    message: "Add \"offers\" with price and availability to the Product schema",
                    impact: "Price and availability can be shown as rich results",
                },
                check: Some(Check::ProductOffers),
            },
            FieldRule {
                fields: &["aggregateRating", "review"],
                requirement: Requirement::Recommended {
                    priority: Priority::Medium,
                    message: "Add \"aggregateRating\" or \"review\" to the Product schema",
                    impact: "Star ratings in search results improve click-through rate",
                },
                check: Some(Check::ProductReviews),
            },
        ],
    },
    SchemaRule {
        schema_type: "Organization",
        fields: &[
            FieldRule {
                fields: &["name"],
                requirement: Requirement::Required {
                    severity: Severity::Warning,
                    message: "Organization schema is missing the \"name\" property",
                    fix: "Add a \"name\" property containing the organization name",
                },
                check: None,
            },
            FieldRule {
                fields: &["url"],
                requirement: Requirement::Required {
                    severity: Severity::Warning,
                    message: "Organization schema is missing the \"url\" property",
                    fix: "Add a \"url\" property pointing at the organization homepage",
                },
                check: None,
            },
            FieldRule {
                fields: &["logo"],
                requirement: Requirement::Recommended {
                    priority: Priority::Low,
                    message: "Add a \"logo\" to the Organization schema",
                    impact: "Logos can appear in knowledge panels",
                },
                check: None,
            },
        ],
    },
    SchemaRule {
        schema_type: "FAQPage",
        fields: &[FieldRule {
            fields: &["mainEntity"],
            requirement: Requirement::Required {
                severity: Severity::Warning,
                message: "FAQPage schema is missing the \"mainEntity\" question list",
                fix: "Add a \"mainEntity\" array of Question nodes with accepted answers",
            },
            check: None,
        }],
    },
];

pub fn rules_for(schema_type: &str) -> Option<&'static SchemaRule> {
    SCHEMA_RULES
        .iter()
        .find(|rule| rule.schema_type == schema_type)
}

/// Outcome of evaluating one field rule against a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleFinding {
    pub rule: &'static FieldRule,
    pub satisfied: bool,
}

/// Returns the distinct `@type` values of a schema in first-seen order.
/// `@type` may be a string or an array of strings.
pub fn schema_types(schema: &Value) -> Vec<String> {
    let names: Vec<&str> = match schema.get("@type") {
        Some(Value::String(name)) => vec![name.as_str()],
        Some(Value::Array(names)) => names.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };

    let mut types: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !name.is_empty() && !types.iter().any(|seen| seen == name) {
            types.push(name.to_string());
        }
    }
    types
}

pub fn has_type(schema: &Value, schema_type: &str) -> bool {
    schema_types(schema).iter().any(|name| name == schema_type)
}

/// Null, `false` and empty strings count as absent
pub fn has_field(schema: &Value, field: &str) -> bool {
    match schema.get(field) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(text)) => !text.is_empty(),
        Some(_) => true,
    }
}

/// Evaluates every rule registered for the schema's `@type` values, in table order
pub fn evaluate_rules(schema: &Value) -> Vec<RuleFinding> {
    schema_types(schema)
        .iter()
        .filter_map(|name| rules_for(name))
        .flat_map(|rule| rule.fields.iter())
        .map(|rule| RuleFinding {
            rule,
            satisfied: rule.fields.iter().any(|field| has_field(schema, field)),
        })
        .collect()
}

/// Validates an arbitrary JSON-LD value.
///
/// A schema is valid when it is an object carrying a non-empty `@type`. Unmet
/// per-type rules are reported as warnings and never make a schema invalid.
pub fn validate_schema(schema: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();

    if !schema.is_object() {
        report
            .errors
            .push("Schema must be a JSON object".to_string());
        return report;
    }

    if schema_types(schema).is_empty() {
        report
            .errors
            .push("Schema is missing the required \"@type\" property".to_string());
        return report;
    }

    if schema.get("@context").and_then(Value::as_str).is_none() {
        report.warnings.push(format!(
            "Schema is missing \"@context\" (expected \"{}\")",
            SCHEMA_CONTEXT
        ));
    }

    report.warnings.extend(
        evaluate_rules(schema)
            .into_iter()
            .filter(|finding| !finding.satisfied)
            .map(|finding| finding.rule.requirement.message().to_string()),
    );

    report.valid = true;
    tracing::debug!(
        types = ?schema_types(schema),
        warnings = report.warnings.len(),
        "schema validated"
    );
    report
}
