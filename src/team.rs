//! Student teams
//!
//! A `StudentTeam` is the identity that owns one or more repositories. It is
//! an immutable set of member identifiers; its display name is derived from
//! the sorted member list, so two teams built from the same members in a
//! different order are equal and share a name.
//!
//! The display name is not injective when members contain `-`
//! (`["jean-luc"]` and `["jean", "luc"]` both display as `jean-luc`), so the
//! on-disk directory uses `dir_name`, which escapes `%` and `-` inside each
//! member before joining.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// An immutable group of one or more members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StudentTeam {
    name: String,
    #[serde(skip)]
    dir_name: String,
    members: BTreeSet<String>,
}

impl StudentTeam {
    /// Build a team from member identifiers.
    ///
    /// Members are trimmed and deduplicated. Fails with `InvalidSpec` if the
    /// team is empty or any member is not usable as a path component.
    pub fn new<I, S>(members: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for member in members {
            let member = member.as_ref().trim();
            validate_member(member)?;
            set.insert(member.to_string());
        }

        if set.is_empty() {
            return Err(Error::invalid_spec("team has no members"));
        }

        let name = set.iter().map(String::as_str).collect::<Vec<_>>().join("-");
        let dir_name = set
            .iter()
            .map(|member| escape_member(member))
            .collect::<Vec<_>>()
            .join("-");
        Ok(Self {
            name,
            dir_name,
            members: set,
        })
    }

    /// Parse a whitespace-separated member line, e.g. `"alice bob"`.
    pub fn from_line(line: &str) -> Result<Self> {
        Self::new(line.split_whitespace())
    }

    /// The derived display name (sorted members joined by `-`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory component for this team. Distinct teams always get
    /// distinct values; equals `name()` when no member contains `-` or `%`.
    pub fn dir_name(&self) -> &str {
        &self.dir_name
    }

    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl fmt::Display for StudentTeam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Name of a team's copy of a template: `{team}-{template}`.
pub fn repo_name_for(team: &StudentTeam, template: &str) -> String {
    format!("{}-{}", team.name(), template)
}

/// Percent-escape the join separator (and the escape character itself).
fn escape_member(member: &str) -> String {
    member.replace('%', "%25").replace('-', "%2D")
}

fn validate_member(member: &str) -> Result<()> {
    if member.is_empty() {
        return Err(Error::invalid_spec("team member identifier is empty"));
    }
    if member == "." || member == ".." {
        return Err(Error::invalid_spec(format!(
            "team member identifier '{}' is reserved",
            member
        )));
    }
    if member
        .chars()
        .any(|c| c.is_whitespace() || c == '/' || c == '\\')
    {
        return Err(Error::invalid_spec(format!(
            "team member identifier '{}' contains whitespace or a path separator",
            member
        )));
    }
    Ok(())
}
