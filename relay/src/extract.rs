//! Projection of trace results into a flattened structure.
//!
//! A raw trace payload nests the person record under `response[0]` with
//! sub-arrays for addresses, employers and telephones. Callers mostly want
//! the first address, the first employer and the first mobile number, so
//! [`extract`] projects exactly those. Extraction never fails; anything
//! missing degrades to `None`.

use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;

/// Flattened projection of a trace result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ExtractedTrace {
    /// First address on record, if any
    pub address: Option<AddressRecord>,
    /// First employer on record, if any
    pub employer: Option<EmployerRecord>,
    /// First CELL-typed telephone entry, if any
    pub cell_number: Option<PhoneRecord>,
}

/// Address fields projected from the first `addresses` entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct AddressRecord {
    /// Address line 1
    pub adrs_line1: Option<String>,
    /// Address line 2
    pub adrs_line2: Option<String>,
    /// Address line 3
    pub adrs_line3: Option<String>,
    /// Address line 4
    pub adrs_line4: Option<String>,
    /// Address type code
    pub adrs_type: Option<String>,
    /// Postal code
    pub postal_code: Option<String>,
    /// Date the record was created upstream
    pub created_date: Option<String>,
    /// Date the record was last updated upstream
    pub last_updated: Option<String>,
}

/// Employer fields projected from the first `employers` entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct EmployerRecord {
    /// Employer name
    pub emp_name: Option<String>,
    /// Occupation description
    pub occupation: Option<String>,
    /// Employer branch code
    pub branch_code: Option<String>,
    /// Date the record was created upstream
    pub created_date: Option<String>,
    /// Date the record was last updated upstream
    pub last_updated: Option<String>,
}

/// Telephone fields projected from the first CELL-typed `telephones` entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct PhoneRecord {
    /// Telephone number
    pub telephone: Option<String>,
    /// Date the record was created upstream
    pub created_date: Option<String>,
    /// Date the record was last updated upstream
    pub last_updated: Option<String>,
}

/// Projects the first address, first employer and first mobile number out of
/// a raw trace result body.
///
/// Pure: same input, same output, no side effects.
#[must_use]
pub fn extract(body: &Value) -> ExtractedTrace {
    let Some(person) = body
        .get("response")
        .and_then(Value::as_array)
        .and_then(|records| records.first())
    else {
        return ExtractedTrace::default();
    };

    ExtractedTrace {
        address: first_entry(person, "addresses").map(AddressRecord::project),
        employer: first_entry(person, "employers").map(EmployerRecord::project),
        cell_number: person
            .get("telephones")
            .and_then(Value::as_array)
            .and_then(|phones| {
                phones.iter().find(|phone| {
                    phone.get("telephone_type").and_then(Value::as_str) == Some("CELL")
                })
            })
            .map(PhoneRecord::project),
    }
}

fn first_entry<'a>(person: &'a Value, key: &str) -> Option<&'a Value> {
    person.get(key).and_then(Value::as_array)?.first()
}

/// Reads a field as text; non-string scalars are rendered, nulls drop out
fn text(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

impl AddressRecord {
    fn project(record: &Value) -> Self {
        Self {
            adrs_line1: text(record, "adrs_line1"),
            adrs_line2: text(record, "adrs_line2"),
            adrs_line3: text(record, "adrs_line3"),
            adrs_line4: text(record, "adrs_line4"),
            adrs_type: text(record, "adrs_type"),
            postal_code: text(record, "postal_code"),
            created_date: text(record, "created_date"),
            last_updated: text(record, "last_updated"),
        }
    }
}

impl EmployerRecord {
    fn project(record: &Value) -> Self {
        Self {
            emp_name: text(record, "emp_name"),
            occupation: text(record, "occupation"),
            branch_code: text(record, "branch_code"),
            created_date: text(record, "created_date"),
            last_updated: text(record, "last_updated"),
        }
    }
}

impl PhoneRecord {
    fn project(record: &Value) -> Self {
        Self {
            telephone: text(record, "telephone"),
            created_date: text(record, "created_date"),
            last_updated: text(record, "last_updated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_trace() -> Value {
        json!({
            "response": [{
                "addresses": [
                    {
                        "adrs_line1": "12 Long Street",
                        "adrs_line2": "Gardens",
                        "adrs_line3": "Cape Town",
                        "adrs_type": "RESIDENTIAL",
                        "postal_code": 8001,
                        "created_date": "2019-03-01",
                        "last_updated": "2023-07-14"
                    },
                    { "adrs_line1": "PO Box 99" }
                ],
                "employers": [
                    {
                        "emp_name": "Acme Mining",
                        "occupation": "Fitter",
                        "branch_code": "ZA-044",
                        "created_date": "2020-01-20",
                        "last_updated": "2022-11-02"
                    }
                ],
                "telephones": [
                    { "telephone_type": "HOME", "telephone": "0215550100" },
                    {
                        "telephone_type": "CELL",
                        "telephone": "0825550199",
                        "created_date": "2021-05-05",
                        "last_updated": "2024-02-09"
                    },
                    { "telephone_type": "CELL", "telephone": "0835550111" }
                ]
            }]
        })
    }

    #[test]
    fn projects_first_entries() {
        let extracted = extract(&sample_trace());

        let address = extracted.address.expect("address");
        assert_eq!(address.adrs_line1.as_deref(), Some("12 Long Street"));
        assert_eq!(address.adrs_line4, None);
        // Non-string scalars come through as rendered text
        assert_eq!(address.postal_code.as_deref(), Some("8001"));

        let employer = extracted.employer.expect("employer");
        assert_eq!(employer.emp_name.as_deref(), Some("Acme Mining"));
        assert_eq!(employer.branch_code.as_deref(), Some("ZA-044"));
    }

    #[test]
    fn picks_first_cell_entry_not_first_telephone() {
        let extracted = extract(&sample_trace());
        let phone = extracted.cell_number.expect("cell number");
        assert_eq!(phone.telephone.as_deref(), Some("0825550199"));
        assert_eq!(phone.created_date.as_deref(), Some("2021-05-05"));
    }

    #[test]
    fn no_cell_entry_means_no_phone() {
        let body = json!({
            "response": [{
                "telephones": [
                    { "telephone_type": "HOME", "telephone": "0215550100" },
                    { "telephone_type": "WORK", "telephone": "0115550100" }
                ]
            }]
        });
        let extracted = extract(&body);
        assert_eq!(extracted.cell_number, None);
        assert_eq!(extracted.address, None);
        assert_eq!(extracted.employer, None);
    }

    #[test]
    fn empty_response_degrades_to_nulls() {
        let extracted = extract(&json!({ "response": [] }));
        assert_eq!(extracted, ExtractedTrace::default());

        let extracted = extract(&json!({}));
        assert_eq!(extracted, ExtractedTrace::default());

        let extracted = extract(&json!("not an object"));
        assert_eq!(extracted, ExtractedTrace::default());
    }

    #[test]
    fn extraction_is_idempotent() {
        let body = sample_trace();
        assert_eq!(extract(&body), extract(&body));
    }
}
