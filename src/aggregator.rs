use crate::extractor::FieldMap;
use crate::schema::{CheckResult, CheckStatus, CANONICAL_FIELDS};

/// Aligns one extraction result with the canonical schema and validates the
/// VIN match.
///
/// Feed labels are free text, so a canonical field is filled from the first
/// extracted entry (in collection order) whose label contains the canonical
/// name as a substring and whose value is non-empty. The looseness is
/// intentional: the same canonical name may occur inside several labels
/// ("Registration plate" also matches "Registration plate date") and the
/// upstream markup gives no stricter handle to match on.
///
/// A populated map whose VIN differs from the requested one describes some
/// other vehicle the search happened to return; it is discarded and the
/// check reports NotFound rather than a wrong-VIN success.
pub fn reconcile(vin: &str, fields: &FieldMap) -> CheckResult {
    let mut values = vec![String::new(); CANONICAL_FIELDS.len()];
    for (i, canonical) in CANONICAL_FIELDS.iter().enumerate() {
        for (label, value) in fields.iter() {
            if label.contains(canonical) && !value.is_empty() {
                values[i] = value.to_string();
                break;
            }
        }
    }

    if values[0] != vin {
        return CheckResult::not_found(vin);
    }

    CheckResult {
        vin: vin.to_string(),
        status: CheckStatus::Success,
        fields: values.split_off(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIN: &str = "XTAKS045LK1178313";

    fn field_index(name: &str) -> usize {
        CANONICAL_FIELDS.iter().position(|f| *f == name).unwrap() - 1
    }

    fn sample_fields() -> FieldMap {
        let mut fields = FieldMap::default();
        fields.set("Lot number", "1".to_string());
        fields.set("Lot name", "LADA Granta, 2019".to_string());
        fields.set("VIN number", VIN.to_string());
        fields.set("Make", "Lada".to_string());
        fields.set("Year of manufacture", "2019".to_string());
        fields
    }

    #[test]
    fn matching_vin_is_a_success() {
        let result = reconcile(VIN, &sample_fields());
        assert_eq!(result.status, CheckStatus::Success);
        assert_eq!(result.vin, VIN);
        assert_eq!(result.fields[field_index("Lot number")], "1");
        assert_eq!(result.fields[field_index("Make")], "Lada");
        assert_eq!(result.fields[field_index("Year")], "2019");
        // Nothing in the map mentions a transmission.
        assert_eq!(result.fields[field_index("Transmission")], "");
    }

    #[test]
    fn vin_mismatch_forces_not_found() {
        let result = reconcile("Z8NBAABD0L0108892", &sample_fields());
        assert_eq!(result.status, CheckStatus::NotFound);
        assert_eq!(result.vin, "Z8NBAABD0L0108892");
        // The populated fields are discarded wholesale.
        assert!(result.fields.iter().all(|v| v.is_empty()));
    }

    #[test]
    fn empty_map_is_not_found() {
        let result = reconcile(VIN, &FieldMap::default());
        assert_eq!(result.status, CheckStatus::NotFound);
        assert_eq!(result.vin, VIN);
    }

    #[test]
    fn first_non_empty_match_wins() {
        let mut fields = FieldMap::default();
        fields.set("Registration plate number", "".to_string());
        fields.set("Registration plate", "A123BC77".to_string());
        fields.set("Registration plate date", "01.01.2020 00:00:00".to_string());
        fields.set("VIN number", VIN.to_string());
        let result = reconcile(VIN, &fields);
        // The empty first label is skipped, the second wins, the third is
        // ignored even though it also contains the canonical name.
        assert_eq!(result.fields[field_index("Registration plate")], "A123BC77");
        assert_eq!(
            result.fields[field_index("Registration plate date")],
            "01.01.2020 00:00:00"
        );
    }
}
