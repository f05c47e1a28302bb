use chrono::{DateTime, Utc};
use serde::Serialize;

use homestock_core::{Cost, DomainError, DomainResult, Entity, FieldValue, Fields, ItemId};

/// Remote field names of an item document.
pub mod field {
    pub const DESCRIPTION: &str = "description";
    pub const ACQUISITION_DATE: &str = "acquisitionDate";
    pub const COST: &str = "cost";
    pub const MAKE: &str = "make";
    pub const MODEL: &str = "model";
    pub const SERIAL_NUMBER: &str = "serialNumber";
    pub const COMMENT: &str = "comment";
}

/// A household inventory item.
///
/// Built fresh from a remote document on every snapshot; there is no identity
/// carried across refreshes beyond the `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    id: ItemId,
    description: String,
    acquisition_date: DateTime<Utc>,
    cost: Cost,
    make: String,
    model: String,
    serial_number: String,
    comment: String,
}

impl Item {
    /// Parse an item from its document id and fields.
    ///
    /// `description`, `acquisitionDate` (timestamp) and `cost` (decimal string)
    /// are required; a missing or null value is `MissingField`, a value of the
    /// wrong shape is `WrongType`. Optional text fields default to empty when
    /// absent or null.
    pub fn parse(id: &str, fields: &Fields) -> DomainResult<Self> {
        let id = ItemId::new(id)?;

        let description = required(fields, field::DESCRIPTION)?;
        let description = description
            .as_str()
            .ok_or_else(|| DomainError::wrong_type(field::DESCRIPTION, "string", description))?;
        if description.trim().is_empty() {
            return Err(DomainError::validation("description cannot be empty"));
        }

        let acquisition_date = required(fields, field::ACQUISITION_DATE)?;
        let acquisition_date = acquisition_date
            .as_timestamp()
            .ok_or_else(|| DomainError::wrong_type(field::ACQUISITION_DATE, "timestamp", acquisition_date))?;

        let cost = required(fields, field::COST)?;
        let cost = cost
            .as_str()
            .ok_or_else(|| DomainError::wrong_type(field::COST, "string", cost))
            .and_then(Cost::parse)?;

        Ok(Self {
            id,
            description: description.to_string(),
            acquisition_date,
            cost,
            make: optional(fields, field::MAKE)?,
            model: optional(fields, field::MODEL)?,
            serial_number: optional(fields, field::SERIAL_NUMBER)?,
            comment: optional(fields, field::COMMENT)?,
        })
    }

    /// Field map to write back to the store.
    ///
    /// Required fields are always present; optional ones only when non-empty,
    /// so an empty string is written as "absent" and read back as empty.
    pub fn to_fields(&self) -> Fields {
        write_fields(
            &self.description,
            self.acquisition_date,
            self.cost,
            [
                (field::MAKE, self.make.as_str()),
                (field::MODEL, self.model.as_str()),
                (field::SERIAL_NUMBER, self.serial_number.as_str()),
                (field::COMMENT, self.comment.as_str()),
            ],
        )
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn acquisition_date(&self) -> DateTime<Utc> {
        self.acquisition_date
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn make(&self) -> &str {
        &self.make
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Case-insensitive substring match against the description.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        self.description
            .to_lowercase()
            .contains(&keyword.to_lowercase())
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

pub(crate) fn write_fields<'a>(
    description: &str,
    acquisition_date: DateTime<Utc>,
    cost: Cost,
    optional: impl IntoIterator<Item = (&'static str, &'a str)>,
) -> Fields {
    let mut fields = Fields::new();
    fields.insert(field::DESCRIPTION.to_string(), description.into());
    fields.insert(field::ACQUISITION_DATE.to_string(), acquisition_date.into());
    fields.insert(field::COST.to_string(), cost.to_string().into());

    for (name, value) in optional {
        if !value.is_empty() {
            fields.insert(name.to_string(), value.into());
        }
    }
    fields
}

fn required<'a>(fields: &'a Fields, name: &str) -> DomainResult<&'a FieldValue> {
    match fields.get(name) {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(DomainError::missing(name)),
    }
}

fn optional(fields: &Fields, name: &str) -> DomainResult<String> {
    match fields.get(name) {
        None | Some(FieldValue::Null) => Ok(String::new()),
        Some(FieldValue::String(s)) => Ok(s.clone()),
        Some(other) => Err(DomainError::wrong_type(name, "string", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 10, 14, 9, 30, 0).unwrap()
    }

    fn required_fields(cost: &str) -> Fields {
        let mut fields = Fields::new();
        fields.insert(field::DESCRIPTION.into(), "Toaster".into());
        fields.insert(field::ACQUISITION_DATE.into(), test_time().into());
        fields.insert(field::COST.into(), cost.into());
        fields
    }

    #[test]
    fn parse_accepts_required_fields_and_defaults_optionals() {
        let item = Item::parse("abc123", &required_fields("19.995")).unwrap();

        assert_eq!(item.id().as_str(), "abc123");
        assert_eq!(item.description(), "Toaster");
        assert_eq!(item.acquisition_date(), test_time());
        assert_eq!(item.cost().to_string(), "20.00");
        assert_eq!(item.make(), "");
        assert_eq!(item.comment(), "");
    }

    #[test]
    fn parse_reads_optional_fields() {
        let mut fields = required_fields("5");
        fields.insert(field::MAKE.into(), "Breville".into());
        fields.insert(field::SERIAL_NUMBER.into(), "SN-42".into());
        fields.insert(field::MODEL.into(), FieldValue::Null);

        let item = Item::parse("x", &fields).unwrap();
        assert_eq!(item.make(), "Breville");
        assert_eq!(item.serial_number(), "SN-42");
        assert_eq!(item.model(), "");
    }

    #[test]
    fn parse_rejects_each_missing_required_field() {
        for name in [field::DESCRIPTION, field::ACQUISITION_DATE, field::COST] {
            let mut fields = required_fields("1.00");
            fields.remove(name);
            match Item::parse("x", &fields).unwrap_err() {
                DomainError::MissingField(f) if f == name => {}
                other => panic!("expected MissingField({name}), got {other:?}"),
            }
        }
    }

    #[test]
    fn parse_treats_null_required_field_as_missing() {
        let mut fields = required_fields("1.00");
        fields.insert(field::COST.into(), FieldValue::Null);
        assert_eq!(
            Item::parse("x", &fields).unwrap_err(),
            DomainError::missing(field::COST)
        );
    }

    #[test]
    fn parse_rejects_wrong_shapes() {
        let mut fields = required_fields("1.00");
        fields.insert(field::COST.into(), FieldValue::Double(1.0));
        let err = Item::parse("x", &fields).unwrap_err();
        assert_eq!(
            err,
            DomainError::WrongType {
                field: field::COST.into(),
                expected: "string",
                found: "double",
            }
        );
        assert_eq!(
            err.to_string(),
            "field `cost` has wrong type: expected string, found double"
        );

        let mut fields = required_fields("1.00");
        fields.insert(field::ACQUISITION_DATE.into(), "2023-10-14".into());
        assert!(matches!(
            Item::parse("x", &fields),
            Err(DomainError::WrongType { .. })
        ));

        let mut fields = required_fields("1.00");
        fields.insert(field::COMMENT.into(), FieldValue::Integer(3));
        assert!(matches!(
            Item::parse("x", &fields),
            Err(DomainError::WrongType { .. })
        ));
    }

    #[test]
    fn parse_rejects_bad_cost_empty_description_and_empty_id() {
        assert!(matches!(
            Item::parse("x", &required_fields("twelve")),
            Err(DomainError::InvalidCost(_))
        ));

        let mut fields = required_fields("1.00");
        fields.insert(field::DESCRIPTION.into(), "  ".into());
        assert!(matches!(
            Item::parse("x", &fields),
            Err(DomainError::Validation(_))
        ));

        assert!(matches!(
            Item::parse("", &required_fields("1.00")),
            Err(DomainError::InvalidId(_))
        ));
    }

    #[test]
    fn to_fields_omits_empty_optionals_and_normalizes_cost() {
        let mut fields = required_fields("3.1");
        fields.insert(field::MAKE.into(), "".into());
        fields.insert(field::COMMENT.into(), "kitchen".into());

        let out = Item::parse("x", &fields).unwrap().to_fields();

        assert_eq!(out.get(field::COST), Some(&FieldValue::from("3.10")));
        assert_eq!(out.get(field::COMMENT), Some(&FieldValue::from("kitchen")));
        assert!(!out.contains_key(field::MAKE));
        assert!(!out.contains_key(field::MODEL));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: parse ∘ to_fields is the identity.
        #[test]
        fn round_trip_preserves_item(
            description in "[A-Za-z][A-Za-z0-9 ]{0,40}",
            cost in "[0-9]{1,6}(\\.[0-9]{0,4})?",
            make in "[A-Za-z]{0,10}",
            comment in "[a-z ]{0,20}",
            secs in 0i64..2_000_000_000i64,
        ) {
            let mut fields = Fields::new();
            fields.insert(field::DESCRIPTION.into(), description.as_str().into());
            fields.insert(field::ACQUISITION_DATE.into(), Utc.timestamp_opt(secs, 0).unwrap().into());
            fields.insert(field::COST.into(), cost.as_str().into());
            fields.insert(field::MAKE.into(), make.as_str().into());
            fields.insert(field::COMMENT.into(), comment.as_str().into());

            let item = Item::parse("doc", &fields).unwrap();
            let again = Item::parse("doc", &item.to_fields()).unwrap();
            prop_assert_eq!(&item, &again);
            prop_assert_eq!(again.to_fields(), item.to_fields());
        }
    }
}
