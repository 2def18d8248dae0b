//! Structural integrity report over a pedigree table.
//!
//! Every check is independent and reports the offending rows tagged with an
//! `error` text column. The report is the concatenation of all checks in a
//! fixed order, so it reads the same whether the checks ran sequentially or
//! in parallel.

use std::collections::HashSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::{Column, Id, Table, Value};
use crate::error::Result;

use super::algebra::{
    missing_records_from, parent_id_set, parents_that_are_both_roles, self_parent_records,
    subjects_with_multiple_records,
};
use super::generations::{stratify, GenerationAnchor};
use super::graph::{Direction, PedigreeGraph};
use super::labels::{PedigreeLabels, SexLabels};

/// Rows at or above which the checks run on the rayon thread pool.
const PARALLEL_THRESHOLD: usize = 10_000;

/// Name of the text column that carries the error tag.
pub const ERROR_COLUMN: &str = "error";

/// Optional inputs to [`validate_pedigree`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    age_label: Option<String>,
    sex: Option<SexLabels>,
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare birth order on this column instead of on generations.
    pub fn age_label(mut self, label: &str) -> Self {
        self.age_label = Some(label.to_string());
        self
    }

    /// Enable the parental sex check.
    pub fn sex(mut self, sex: SexLabels) -> Self {
        self.sex = Some(sex);
        self
    }

    pub fn get_age_label(&self) -> Option<&str> {
        self.age_label.as_deref()
    }

    pub fn get_sex(&self) -> Option<&SexLabels> {
        self.sex.as_ref()
    }

    /// Checks to run, in report order.
    pub fn checks(&self) -> Vec<Check> {
        let mut checks = vec![
            Check::BornBeforeParent,
            Check::NoOwnRecord,
            Check::OwnParent,
            Check::MultipleRecords,
            Check::BothRoles,
        ];
        if self.sex.is_some() {
            checks.push(Check::WrongSex);
        }
        checks
    }

    fn required_columns<'a>(&'a self, labels: &'a PedigreeLabels) -> Vec<&'a str> {
        let mut required = labels.all().to_vec();
        required.extend(self.age_label.as_deref());
        required.extend(self.sex.as_ref().map(|s| s.label.as_str()));
        required
    }
}

/// Result of [`validate_pedigree`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    /// `true` when no check reported a row.
    pub is_valid: bool,
    /// Offending rows: the input columns plus [`ERROR_COLUMN`].
    pub errors: Table,
}

impl ValidationReport {
    /// Number of error rows whose tag is exactly `tag`.
    pub fn count(&self, tag: &str) -> usize {
        match self.errors.get_column(ERROR_COLUMN) {
            Ok(Column::Text(tags)) => tags.iter().filter(|t| t.as_deref() == Some(tag)).count(),
            _ => 0,
        }
    }
}

/// A single structural check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Subject is not younger than one of its parents. Tagged per parental
    /// role, e.g. `"was born before sire"`.
    BornBeforeParent,
    /// Parent referenced without a record of its own.
    NoOwnRecord,
    /// Subject listed as its own parent.
    OwnParent,
    /// Subject with more than one record.
    MultipleRecords,
    /// Subject used both as sire and as dam.
    BothRoles,
    /// Subject whose sex does not match a parental role it is used in.
    WrongSex,
}

impl Check {
    pub fn tag(&self) -> &'static str {
        match self {
            Check::BornBeforeParent => "was born before",
            Check::NoOwnRecord => "has no own record",
            Check::OwnParent => "is own parent",
            Check::MultipleRecords => "has multiple own records",
            Check::BothRoles => "is both sire and dam",
            Check::WrongSex => "wrong sex for parental role",
        }
    }

    fn run(&self, ctx: &Context<'_>) -> Result<Table> {
        match self {
            Check::BornBeforeParent => born_before_parent(ctx),
            Check::NoOwnRecord => tagged(
                missing_records_from(ctx.table, ctx.labels, &ctx.graph)?,
                self.tag(),
            ),
            Check::OwnParent => tagged(self_parent_records(ctx.table, ctx.labels)?, self.tag()),
            Check::MultipleRecords => tagged(
                subjects_with_multiple_records(ctx.table, &ctx.labels.subject)?,
                self.tag(),
            ),
            Check::BothRoles => both_roles(ctx),
            Check::WrongSex => wrong_sex(ctx),
        }
    }
}

struct Context<'a> {
    table: &'a Table,
    labels: &'a PedigreeLabels,
    options: &'a ValidationOptions,
    graph: PedigreeGraph,
}

/// Run every structural check on `table`.
///
/// Data problems are reported as rows and never raise.
///
/// # Errors
/// Returns [`crate::PedigreeError::Schema`] if the id labels, the age label or
/// the sex label are missing, before any check runs.
pub fn validate_pedigree(
    table: &Table,
    labels: &PedigreeLabels,
    options: &ValidationOptions,
) -> Result<ValidationReport> {
    table.require_columns(&options.required_columns(labels))?;
    let ctx = Context {
        table,
        labels,
        options,
        graph: PedigreeGraph::from_table(table, labels)?,
    };
    let errors = run_checks(&ctx, &options.checks(), table.nrows() >= PARALLEL_THRESHOLD)?;
    log::debug!(
        "validated {} rows: {} error rows",
        table.nrows(),
        errors.nrows()
    );
    Ok(ValidationReport {
        is_valid: errors.nrows() == 0,
        errors,
    })
}

fn run_checks(ctx: &Context<'_>, checks: &[Check], parallel: bool) -> Result<Table> {
    let parts: Vec<Table> = if parallel {
        checks
            .par_iter()
            .map(|c| c.run(ctx))
            .collect::<Result<Vec<_>>>()?
    } else {
        checks
            .iter()
            .map(|c| c.run(ctx))
            .collect::<Result<Vec<_>>>()?
    };
    for (check, part) in checks.iter().zip(&parts) {
        log::debug!("{:?}: {} rows", check, part.nrows());
    }
    Table::concat(&parts)
}

fn tagged(rows: Table, tag: &str) -> Result<Table> {
    let tags = Column::Text(vec![Some(tag.to_string()); rows.nrows()]);
    rows.with_column(ERROR_COLUMN, tags)
}

/// Age of each row: the age column when configured, otherwise the
/// chronological generation.
fn row_ages(ctx: &Context<'_>) -> Result<Vec<Option<Value>>> {
    match ctx.options.age_label.as_deref() {
        Some(label) => {
            let column = ctx.table.get_column(label)?;
            Ok((0..ctx.table.nrows()).map(|r| column.get(r)).collect())
        }
        None => Ok(stratify(&ctx.graph, GenerationAnchor::Chronological)
            .rows()
            .iter()
            .map(|g| g.map(|g| Value::Int(i64::from(g))))
            .collect()),
    }
}

fn born_before_parent(ctx: &Context<'_>) -> Result<Table> {
    let ages = row_ages(ctx)?;
    let older_than_parent = |age: &Value, parent: &Id| {
        ctx.graph.node(parent).is_some_and(|p| {
            ctx.graph
                .rows(p)
                .iter()
                .any(|&pr| ages[pr].as_ref().is_some_and(|pa| age <= pa))
        })
    };

    let mut parts = Vec::with_capacity(2);
    for label in ctx.labels.parents() {
        let parents = ctx.table.ids(label)?;
        let rows: Vec<usize> = (0..ctx.table.nrows())
            .filter(|&r| match (&ages[r], &parents[r]) {
                (Some(age), Some(parent)) => older_than_parent(age, parent),
                _ => false,
            })
            .collect();
        let tag = format!("{} {}", Check::BornBeforeParent.tag(), label);
        parts.push(tagged(ctx.table.take(&rows), &tag)?);
    }
    Table::concat(&parts)
}

fn both_roles(ctx: &Context<'_>) -> Result<Table> {
    let [sire, dam] = ctx.labels.parents();
    let both: HashSet<Id> = parents_that_are_both_roles(ctx.table, (sire, dam))?
        .into_iter()
        .collect();
    let subjects = ctx.table.ids(&ctx.labels.subject)?;
    let rows = ctx
        .table
        .filter(|r| subjects[r].as_ref().is_some_and(|s| both.contains(s)));
    tagged(rows, Check::BothRoles.tag())
}

fn wrong_sex(ctx: &Context<'_>) -> Result<Table> {
    let Some(sex) = ctx.options.sex.as_ref() else {
        return tagged(ctx.table.empty_like(), Check::WrongSex.tag());
    };
    let column = ctx.table.get_column(&sex.label)?;
    let subjects = ctx.table.ids(&ctx.labels.subject)?;

    let roles = [
        (ctx.labels.parent_a.as_str(), &sex.codes.parent_a),
        (ctx.labels.parent_b.as_str(), &sex.codes.parent_b),
    ];
    let mut parts = Vec::with_capacity(2);
    for (label, code) in roles {
        let used: HashSet<Id> = parent_id_set(ctx.table, &[label])?.into_iter().collect();
        let rows: Vec<usize> = (0..ctx.table.nrows())
            .filter(|&r| {
                subjects[r].as_ref().is_some_and(|s| used.contains(s))
                    && column
                        .get(r)
                        .is_some_and(|v| sex.codes.canonical(&v).as_ref() != Some(code))
            })
            .collect();
        parts.push(ctx.table.take(&rows));
    }
    tagged(Table::concat(&parts)?, Check::WrongSex.tag())
}

/// Rows of individuals whose age is not below the youngest age among their
/// own offspring, in either parental role.
///
/// Rows with a null or incomparable age are never reported.
///
/// # Errors
/// Returns an error if a label or `age_label` is missing.
pub fn parents_used_before_birth(
    table: &Table,
    labels: &PedigreeLabels,
    age_label: &str,
) -> Result<Table> {
    let mut required = labels.all().to_vec();
    required.push(age_label);
    table.require_columns(&required)?;

    let graph = PedigreeGraph::from_table(table, labels)?;
    let ages = table.get_column(age_label)?;

    let youngest_offspring = |node: usize| -> Option<Value> {
        graph
            .neighbours(node, Direction::Descendants)
            .iter()
            .flat_map(|&child| graph.rows(child))
            .filter_map(|&r| ages.get(r))
            .fold(None, |min: Option<Value>, age| match min {
                Some(m) if m <= age => Some(m),
                _ => Some(age),
            })
    };

    Ok(table.filter(|r| {
        let (Some(node), Some(age)) = (graph.row_node(r), ages.get(r)) else {
            return false;
        };
        youngest_offspring(node).is_some_and(|min| age >= min)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PedigreeError;
    use crate::pedigree::fixtures;

    fn with_birth_and_sex(t: &Table) -> Table {
        let anim = t.ids("anim").unwrap();
        let birth = [2000, 2000, 2003, 1999, 2005, 2006, 2007, 2007, 2008];
        let sex: Vec<Option<i64>> = anim
            .iter()
            .map(|a| match a {
                Some(Id::Int(v)) => Some(v % 2 + 1),
                _ => None,
            })
            .collect();
        let mut out = t.clone();
        out.add_integer_column("birth", birth.iter().map(|&b| Some(b)).collect())
            .unwrap();
        out.add_integer_column("sex", sex).unwrap();
        out
    }

    fn tags(report: &ValidationReport) -> Vec<String> {
        match report.errors.get_column(ERROR_COLUMN).unwrap() {
            Column::Text(v) => v.iter().flatten().cloned().collect(),
            other => panic!("unexpected error column {:?}", other.kind()),
        }
    }

    #[test]
    fn test_valid_pedigree() {
        let (t, labels) = fixtures::zhang();
        let report = validate_pedigree(&t, &labels, &ValidationOptions::new()).unwrap();
        assert!(report.is_valid);
        assert_eq!(report.errors.nrows(), 0);
        assert_eq!(report.errors.column_names(), vec!["progeny", "sire", "dam", "error"]);
    }

    #[test]
    fn test_errors_fixture_with_generations() {
        let (t, labels) = fixtures::errors();
        let report = validate_pedigree(&t, &labels, &ValidationOptions::new()).unwrap();
        assert!(!report.is_valid);
        assert_eq!(
            tags(&report),
            vec![
                "was born before dam",
                "has no own record",
                "is own parent",
                "has multiple own records",
                "has multiple own records",
                "is both sire and dam",
            ]
        );
        assert_eq!(report.errors.value("anim", 1).unwrap(), Some(Value::Int(9)));
        assert!(report.errors.get_column("sire").unwrap().is_null(1));
        assert_eq!(report.errors.value("anim", 5).unwrap(), Some(Value::Int(3)));
    }

    #[test]
    fn test_errors_fixture_with_age_and_sex() {
        let (t, labels) = fixtures::errors();
        let t = with_birth_and_sex(&t);
        let options = ValidationOptions::new()
            .age_label("birth")
            .sex(SexLabels::default());
        let report = validate_pedigree(&t, &labels, &options).unwrap();
        assert_eq!(report.count("was born before sire"), 1);
        assert_eq!(report.count("was born before dam"), 2);
        assert_eq!(report.count("is own parent"), 1);
        assert_eq!(report.count("has multiple own records"), 2);
        assert_eq!(report.count("is both sire and dam"), 1);
        assert_eq!(report.count("wrong sex for parental role"), 3);
        assert_eq!(report.errors.nrows(), 3 + 1 + 1 + 2 + 1 + 3);
        assert_eq!(
            report.errors.column_names(),
            vec!["anim", "sire", "dam", "birth", "sex", "error"]
        );

        // Sire-role mismatches come before dam-role ones.
        let wrong: Vec<Option<Value>> = (0..report.errors.nrows())
            .filter(|&r| {
                report.errors.value(ERROR_COLUMN, r).unwrap()
                    == Some(Value::Text("wrong sex for parental role".into()))
            })
            .map(|r| report.errors.value("anim", r).unwrap())
            .collect();
        assert_eq!(
            wrong,
            vec![Some(Value::Int(1)), Some(Value::Int(3)), Some(Value::Int(2))]
        );
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let (t, labels) = fixtures::errors();
        let t = with_birth_and_sex(&t);
        let options = ValidationOptions::new()
            .age_label("birth")
            .sex(SexLabels::default());
        let ctx = Context {
            table: &t,
            labels: &labels,
            options: &options,
            graph: PedigreeGraph::from_table(&t, &labels).unwrap(),
        };
        let checks = options.checks();
        assert_eq!(
            run_checks(&ctx, &checks, true).unwrap(),
            run_checks(&ctx, &checks, false).unwrap()
        );
    }

    #[test]
    fn test_missing_labels_fail_before_checks() {
        let (t, labels) = fixtures::errors();
        let options = ValidationOptions::new().age_label("birth").sex(SexLabels::default());
        match validate_pedigree(&t, &labels, &options).unwrap_err() {
            PedigreeError::Schema { missing } => assert_eq!(missing, vec!["birth", "sex"]),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_checks_order() {
        assert_eq!(ValidationOptions::new().checks().len(), 5);
        let checks = ValidationOptions::new().sex(SexLabels::default()).checks();
        assert_eq!(checks.first(), Some(&Check::BornBeforeParent));
        assert_eq!(checks.last(), Some(&Check::WrongSex));
    }

    #[test]
    fn test_parents_used_before_birth() {
        let (t, labels) = fixtures::errors();
        let t = with_birth_and_sex(&t);
        let early = parents_used_before_birth(&t, &labels, "birth").unwrap();
        assert_eq!(
            early.ids("anim").unwrap(),
            vec![Some(Id::Int(1)), Some(Id::Int(2)), Some(Id::Int(5))]
        );
        assert!(matches!(
            parents_used_before_birth(&t, &labels, "age").unwrap_err(),
            PedigreeError::Schema { .. }
        ));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ValidationOptions = serde_json::from_str(r#"{"age_label": "birth"}"#).unwrap();
        assert_eq!(options, ValidationOptions::new().age_label("birth"));
        assert_eq!(options.get_sex(), None);
    }
}
