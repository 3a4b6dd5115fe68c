use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Optional bounds applied when listing subjects.
///
/// Every bound is inclusive. Unset fields do not constrain the result,
/// so an empty filter matches every stored subject. Range pairs are
/// applied independently; a contradictory pair simply matches nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectFilter {
    pub id_min: Option<i64>,
    pub id_max: Option<i64>,
    pub weight_min: Option<f64>,
    pub weight_max: Option<f64>,
    pub length_min: Option<f64>,
    pub length_max: Option<f64>,
    pub is_active: Option<bool>,
    pub created_after: Option<OffsetDateTime>,
    pub created_before: Option<OffsetDateTime>,
    pub deleted_after: Option<OffsetDateTime>,
    pub deleted_before: Option<OffsetDateTime>,
}

/// How a bound compares against its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    GtEq,
    LtEq,
    Eq,
}

impl Comparison {
    pub fn sql(self) -> &'static str {
        match self {
            Comparison::GtEq => ">=",
            Comparison::LtEq => "<=",
            Comparison::Eq => "=",
        }
    }
}

/// A bound value, typed so storage can bind it without guessing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Int(i64),
    Float(f64),
    Bool(bool),
    Time(OffsetDateTime),
}

impl Bound {
    fn render(self) -> String {
        match self {
            Bound::Int(value) => value.to_string(),
            Bound::Float(value) => value.to_string(),
            Bound::Bool(value) => value.to_string(),
            Bound::Time(value) => value
                .format(&Rfc3339)
                .unwrap_or_else(|_| value.unix_timestamp().to_string()),
        }
    }
}

/// One concrete condition derived from a set filter field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Predicate {
    pub column: &'static str,
    pub comparison: Comparison,
    pub value: Bound,
}

impl SubjectFilter {
    pub fn is_empty(&self) -> bool {
        self.predicates().is_empty()
    }

    /// Expands the set fields into column conditions.
    ///
    /// The deleted-at bounds intentionally compare against a nullable
    /// column; rows that were never retired fail both and drop out.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut out = Vec::new();
        let mut push = |column, comparison, value| {
            out.push(Predicate {
                column,
                comparison,
                value,
            });
        };

        if let Some(v) = self.id_min {
            push("id", Comparison::GtEq, Bound::Int(v));
        }
        if let Some(v) = self.id_max {
            push("id", Comparison::LtEq, Bound::Int(v));
        }
        if let Some(v) = self.weight_min {
            push("weight", Comparison::GtEq, Bound::Float(v));
        }
        if let Some(v) = self.weight_max {
            push("weight", Comparison::LtEq, Bound::Float(v));
        }
        if let Some(v) = self.length_min {
            push("length", Comparison::GtEq, Bound::Float(v));
        }
        if let Some(v) = self.length_max {
            push("length", Comparison::LtEq, Bound::Float(v));
        }
        if let Some(v) = self.is_active {
            push("is_active", Comparison::Eq, Bound::Bool(v));
        }
        if let Some(v) = self.created_after {
            push("create_at", Comparison::GtEq, Bound::Time(v));
        }
        if let Some(v) = self.created_before {
            push("create_at", Comparison::LtEq, Bound::Time(v));
        }
        if let Some(v) = self.deleted_after {
            push("delete_at", Comparison::GtEq, Bound::Time(v));
        }
        if let Some(v) = self.deleted_before {
            push("delete_at", Comparison::LtEq, Bound::Time(v));
        }

        out
    }

    /// The set fields as `(name, rendered value)` pairs in canonical
    /// (alphabetical) order. Cache keys are built from this, so the
    /// order must not depend on how the filter was populated.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        let mut push = |name, rendered: Option<String>| {
            if let Some(rendered) = rendered {
                out.push((name, rendered));
            }
        };

        push(
            "created_after",
            self.created_after.map(|v| Bound::Time(v).render()),
        );
        push(
            "created_before",
            self.created_before.map(|v| Bound::Time(v).render()),
        );
        push(
            "deleted_after",
            self.deleted_after.map(|v| Bound::Time(v).render()),
        );
        push(
            "deleted_before",
            self.deleted_before.map(|v| Bound::Time(v).render()),
        );
        push("id_max", self.id_max.map(|v| Bound::Int(v).render()));
        push("id_min", self.id_min.map(|v| Bound::Int(v).render()));
        push("is_active", self.is_active.map(|v| Bound::Bool(v).render()));
        push(
            "length_max",
            self.length_max.map(|v| Bound::Float(v).render()),
        );
        push(
            "length_min",
            self.length_min.map(|v| Bound::Float(v).render()),
        );
        push(
            "weight_max",
            self.weight_max.map(|v| Bound::Float(v).render()),
        );
        push(
            "weight_min",
            self.weight_min.map(|v| Bound::Float(v).render()),
        );

        out
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn empty_filter_has_no_predicates() {
        let filter = SubjectFilter::default();
        assert!(filter.is_empty());
        assert!(filter.predicates().is_empty());
        assert!(filter.entries().is_empty());
    }

    #[test]
    fn every_field_maps_to_its_column_and_comparison() {
        let filter = SubjectFilter {
            id_min: Some(1),
            id_max: Some(9),
            weight_min: Some(10.5),
            weight_max: Some(20.0),
            length_min: Some(30.0),
            length_max: Some(40.0),
            is_active: Some(true),
            created_after: Some(datetime!(2026-12-01 00:00 UTC)),
            created_before: Some(datetime!(2026-12-31 00:00 UTC)),
            deleted_after: Some(datetime!(2026-12-10 00:00 UTC)),
            deleted_before: Some(datetime!(2026-12-20 00:00 UTC)),
        };

        let got: Vec<(&str, &str)> = filter
            .predicates()
            .iter()
            .map(|p| (p.column, p.comparison.sql()))
            .collect();

        assert_eq!(
            got,
            vec![
                ("id", ">="),
                ("id", "<="),
                ("weight", ">="),
                ("weight", "<="),
                ("length", ">="),
                ("length", "<="),
                ("is_active", "="),
                ("create_at", ">="),
                ("create_at", "<="),
                ("delete_at", ">="),
                ("delete_at", "<="),
            ]
        );
    }

    #[test]
    fn entries_are_alphabetical_and_rendered() {
        let filter = SubjectFilter {
            weight_min: Some(12.5),
            id_max: Some(40),
            is_active: Some(false),
            created_after: Some(datetime!(2026-12-01 00:00 UTC)),
            ..SubjectFilter::default()
        };

        assert_eq!(
            filter.entries(),
            vec![
                ("created_after", "2026-12-01T00:00:00Z".to_string()),
                ("id_max", "40".to_string()),
                ("is_active", "false".to_string()),
                ("weight_min", "12.5".to_string()),
            ]
        );
    }

    #[test]
    fn whole_floats_render_without_trailing_zeroes() {
        let filter = SubjectFilter {
            weight_min: Some(12.0),
            ..SubjectFilter::default()
        };
        assert_eq!(filter.entries(), vec![("weight_min", "12".to_string())]);
    }
}
