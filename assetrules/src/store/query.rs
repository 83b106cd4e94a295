use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::record::{FieldValue, Record, RecordId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOperator {
    Equal,
    NotEqual,
}

/// What a condition compares against: the record id or a named attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionTarget {
    Id(RecordId),
    Field { name: String, value: FieldValue },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub target: ConditionTarget,
    pub operator: ConditionOperator,
}

impl Condition {
    pub fn field_eq(name: &str, value: impl Into<FieldValue>) -> Self {
        Self {
            target: ConditionTarget::Field {
                name: name.to_string(),
                value: value.into(),
            },
            operator: ConditionOperator::Equal,
        }
    }

    pub fn id_ne(id: RecordId) -> Self {
        Self {
            target: ConditionTarget::Id(id),
            operator: ConditionOperator::NotEqual,
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        let equal = match &self.target {
            ConditionTarget::Id(id) => record.id == *id,
            ConditionTarget::Field { name, value } => {
                record.get(name).is_some_and(|actual| values_match(actual, value))
            }
        };
        match self.operator {
            ConditionOperator::Equal => equal,
            ConditionOperator::NotEqual => !equal,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub order: SortOrder,
}

/// Filtered, ordered read over one entity.
///
/// Conditions are combined with AND. Records missing an ordering attribute
/// sort before any record that has it.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub entity: String,
    pub columns: Option<Vec<String>>,
    pub conditions: Vec<Condition>,
    pub orders: Vec<OrderBy>,
    pub top: Option<usize>,
}

impl Query {
    pub fn new(entity: &str) -> Self {
        Self {
            entity: entity.to_string(),
            columns: None,
            conditions: Vec::new(),
            orders: Vec::new(),
            top: None,
        }
    }

    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = Some(columns.iter().map(|column| column.to_string()).collect());
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn order_by(mut self, field: &str, order: SortOrder) -> Self {
        self.orders.push(OrderBy {
            field: field.to_string(),
            order,
        });
        self
    }

    pub fn top(mut self, count: usize) -> Self {
        self.top = Some(count);
        self
    }

    pub fn matches(&self, record: &Record) -> bool {
        record.entity == self.entity && self.conditions.iter().all(|condition| condition.matches(record))
    }

    pub fn compare(&self, left: &Record, right: &Record) -> Ordering {
        for order in &self.orders {
            let ordering = compare_values(left.get(&order.field), right.get(&order.field));
            let ordering = match order.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

fn values_match(actual: &FieldValue, expected: &FieldValue) -> bool {
    match (actual, expected) {
        (FieldValue::Reference(actual), FieldValue::Reference(expected)) => actual.id == expected.id,
        _ => actual == expected,
    }
}

fn compare_values(left: Option<&FieldValue>, right: Option<&FieldValue>) -> Ordering {
    use FieldValue::*;

    match (left, right) {
        (None | Some(Null), None | Some(Null)) => Ordering::Equal,
        (None | Some(Null), Some(_)) => Ordering::Less,
        (Some(_), None | Some(Null)) => Ordering::Greater,
        (Some(Text(a)), Some(Text(b))) => a.cmp(b),
        (Some(Integer(a)), Some(Integer(b))) => a.cmp(b),
        (Some(OptionSet(a)), Some(OptionSet(b))) => a.cmp(b),
        (Some(DateTime(a)), Some(DateTime(b))) => a.cmp(b),
        (Some(Decimal(a)), Some(Decimal(b))) => a.total_cmp(b),
        (Some(Integer(a)), Some(Decimal(b))) => (*a as f64).total_cmp(b),
        (Some(Decimal(a)), Some(Integer(b))) => a.total_cmp(&(*b as f64)),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::EntityRef;

    #[test]
    fn reference_conditions_compare_ids() {
        let parent = RecordId::new();
        let record = Record::new("child", RecordId::new()).with("parent", EntityRef::new("parent", parent));
        assert!(Condition::field_eq("parent", EntityRef::new("anything", parent)).matches(&record));
        assert!(!Condition::field_eq("parent", EntityRef::new("parent", RecordId::new())).matches(&record));
        assert!(Condition::id_ne(RecordId::new()).matches(&record));
        assert!(!Condition::id_ne(record.id).matches(&record));
    }

    #[test]
    fn missing_values_sort_first() {
        let query = Query::new("e").order_by("n", SortOrder::Asc);
        let empty = Record::new("e", RecordId::new());
        let one = Record::new("e", RecordId::new()).with("n", FieldValue::Integer(1));
        assert_eq!(query.compare(&empty, &one), Ordering::Less);

        let query = Query::new("e").order_by("n", SortOrder::Desc);
        assert_eq!(query.compare(&empty, &one), Ordering::Greater);
    }
}
