//! SQL run against the analytics store, and decoding of its result rows

use anyhow::{bail, Context, Result};
use mergebase_core::DuplicateGroup;
use serde_json::{Map, Value};

/// Distinct head shas of jobs with failed tests that have no merge base yet
pub const FAILED_TEST_SHAS_QUERY: &str = "
SELECT
    DISTINCT j.head_sha
FROM
    commons.failed_tests_run t
    join workflow_job j on t.job_id = j.id
    left outer join commons.merge_bases mb on j.head_sha = mb.sha
where
    mb.merge_base is null
";

/// Record ids grouped by sha, for shas stored more than once
pub const DUP_MERGE_BASE_QUERY: &str = "
select
    m.sha as sha,
    ARRAY_AGG(m._id) as ids
from
    commons.merge_bases m
group by
    m.sha
having
    count(*) > 1
";

pub(crate) type Row = Map<String, Value>;

/// Decodes one `DUP_MERGE_BASE_QUERY` row
pub(crate) fn duplicate_group(row: &Row) -> Result<DuplicateGroup> {
    let sha = row
        .get("sha")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let Some(values) = row.get("ids").and_then(Value::as_array) else {
        bail!("Duplicate row has no `ids` array: {}", Value::Object(row.clone()));
    };

    let ids = values
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .with_context(|| format!("Non-string record id {} for sha {:?}", v, sha))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DuplicateGroup::new(sha, ids))
}

/// Decodes one `FAILED_TEST_SHAS_QUERY` row
pub(crate) fn head_sha(row: &Row) -> Result<String> {
    row.get("head_sha")
        .and_then(Value::as_str)
        .map(str::to_string)
        .with_context(|| format!("Row has no string `head_sha`: {}", Value::Object(row.clone())))
}
