use std::collections::BTreeMap;

use crate::process::{CountTable, GeoRow};

/// A row entering aggregation. `counts` is `None` when a left join found no
/// data for the member; it contributes zeros but still makes the group exist.
#[derive(Debug, Clone, Copy)]
pub struct GroupMember<'a> {
    pub group_id: &'a str,
    pub group_name: &'a str,
    pub counts: Option<&'a [i64]>,
}

/// Sum every count column per `group_id`, carrying the group's name along.
/// Output is sorted by group id.
pub fn aggregate_count_data<'a, I>(columns: &[String], members: I) -> CountTable
where
    I: IntoIterator<Item = GroupMember<'a>>,
{
    let mut groups: BTreeMap<&'a str, (&'a str, Vec<i64>)> = BTreeMap::new();
    for m in members {
        let (_, sums) = groups
            .entry(m.group_id)
            .or_insert_with(|| (m.group_name, vec![0; columns.len()]));
        if let Some(counts) = m.counts {
            for (acc, v) in sums.iter_mut().zip(counts) {
                *acc += v;
            }
        }
    }

    CountTable {
        columns: columns.to_vec(),
        rows: groups
            .into_iter()
            .map(|(id, (name, counts))| GeoRow {
                geo_id: id.to_string(),
                geo_name: Some(name.to_string()),
                geometry: None,
                counts,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_per_group_and_keeps_empty_groups() {
        let cols = vec!["jobs".to_string(), "young".to_string()];
        let a = [10, 1];
        let b = [15, 2];
        let members = vec![
            GroupMember { group_id: "N2", group_name: "North", counts: None },
            GroupMember { group_id: "N1", group_name: "Center", counts: Some(&a) },
            GroupMember { group_id: "N1", group_name: "Center", counts: Some(&b) },
        ];

        let out = aggregate_count_data(&cols, members);
        assert_eq!(out.len(), 2);
        assert_eq!(out.rows[0].geo_id, "N1");
        assert_eq!(out.rows[0].counts, vec![25, 3]);
        assert_eq!(out.rows[0].geo_name.as_deref(), Some("Center"));
        assert_eq!(out.rows[1].counts, vec![0, 0]);
    }
}
