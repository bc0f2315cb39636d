//! Families: members grouped by `family_no`.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::entities::profiles::{Profile, TABLE};
use crate::entities::select_all;
use crate::hooks::{Fetch, QueryParams};
use crate::serde_utils::id_value;
use crate::store::{Order, Paged, Remote, Select, StoreResult, value_text};

/// Columns the family search matches against.
pub const SEARCH_COLUMNS: &[&str] = &["name", "surname"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Family {
    /// The shared `family_no`.
    pub id: String,
    /// `"<head surname> Family"`
    pub name: String,
    pub head_name: String,
    pub head_image: Option<String>,
    pub cover_image: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    /// Taken from the first member.
    pub pin_code: Option<String>,
    pub total_members: usize,
    pub members: Vec<Profile>,
}

fn is_head(profile: &Profile) -> bool {
    profile
        .relationship
        .as_deref()
        .is_some_and(|r| r.trim().eq_ignore_ascii_case("self"))
}

fn build_family(id: String, members: Vec<Profile>) -> Option<Family> {
    let head = members
        .iter()
        .find(|m| is_head(m))
        .or_else(|| members.first())?
        .clone();
    let surname = head.surname.clone().unwrap_or_default();
    Some(Family {
        id,
        name: format!("{surname} Family").trim().to_string(),
        head_name: head.full_name(),
        head_image: head.profile_pic.clone(),
        cover_image: head.family_cover_pic.clone(),
        address: head.residential_address_line1.clone(),
        city: head.residential_address_city.clone(),
        state: head.residential_address_state.clone(),
        pin_code: members.first().and_then(|m| m.pin_code.clone()),
        total_members: members.len(),
        members,
    })
}

/// Group members by `family_no` in first-seen order.
///
/// The head is the first member whose relationship is `self` (any case), or
/// the first member when none is. Members without a family number are skipped.
pub fn group_families(rows: Vec<Profile>) -> Vec<Family> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<Profile>> = HashMap::new();
    for profile in rows {
        let Some(family_no) = profile.family_no.clone() else {
            continue;
        };
        groups
            .entry(family_no.clone())
            .or_insert_with(|| {
                order.push(family_no);
                Vec::new()
            })
            .push(profile);
    }
    order
        .into_iter()
        .filter_map(|id| {
            let members = groups.remove(&id)?;
            build_family(id, members)
        })
        .collect()
}

/// Paged families.
///
/// Pages over the distinct family numbers of matching members in ascending
/// order, then loads every member of the families on the page. The count is
/// the number of distinct matching families.
#[derive(Debug, Clone, Copy, Default)]
pub struct FamiliesQuery;

#[async_trait]
impl Fetch for FamiliesQuery {
    type Output = Paged<Family>;

    async fn fetch(&self, remote: &dyn Remote, params: &QueryParams) -> StoreResult<Paged<Family>> {
        let numbers = remote
            .query()
            .select(
                &Select::table(TABLE)
                    .columns("family_no")
                    .not_null("family_no")
                    .ilike_any(SEARCH_COLUMNS, &params.search)
                    .order(Order::asc("family_no")),
            )
            .await?;

        let mut distinct: Vec<String> = Vec::new();
        for row in &numbers.rows {
            if let Some(value) = row.get("family_no").filter(|v| !v.is_null()) {
                let text = value_text(value);
                if !distinct.contains(&text) {
                    distinct.push(text);
                }
            }
        }
        let count = distinct.len();

        let (from, _) = params.pagination.range();
        let page: Vec<String> = distinct
            .into_iter()
            .skip(from)
            .take(params.pagination.page_size())
            .collect();
        if page.is_empty() {
            return Ok(Paged {
                rows: Vec::new(),
                count,
            });
        }

        let members: Vec<Profile> = select_all(
            remote,
            Select::table(TABLE).is_in("family_no", page.iter().map(|f| id_value(f)).collect()),
        )
        .await?;

        let mut families = group_families(members);
        families.sort_by_key(|f| page.iter().position(|p| *p == f.id));
        Ok(Paged {
            rows: families,
            count,
        })
    }
}

#[cfg(test)]
#[path = "families_test.rs"]
mod families_test;
