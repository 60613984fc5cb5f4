//! Pre-filled Google Form link for a sprint.
//!
//! Each value is sent as `entry.<id>=<value>`; the ids belong to the published form.

use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

use crate::collect::SprintData;
use crate::config::FormConfig;

// TODO: the form asks for a team name; project_name stands in until boards map to teams.
const PROJECT_NAME_ENTRY: &str = "entry.1082637073";
const SPRINT_NUMBER_ENTRY: &str = "entry.1975251686";

const POINTS_ENTRIES: &[(&str, &str)] = &[
  ("committed", "entry.1427603868"),
  ("completed", "entry.1486076673"),
  ("feature_completed", "entry.254612996"),
  ("not_completed", "entry.611444996"),
  ("optimization_completed", "entry.2092919144"),
  ("planned_completed", "entry.493624591"),
  ("removed", "entry.976792423"),
  ("unplanned_completed", "entry.1333444050"),
];

const ITEMS_ENTRIES: &[(&str, &str)] = &[
  ("bugs_completed", "entry.448087930"),
  ("committed", "entry.2095001800"),
  ("completed", "entry.1399119358"),
  ("not_completed", "entry.128659456"),
  ("planned_completed", "entry.954885633"),
  ("removed", "entry.1137054034"),
  ("stories_completed", "entry.1980453543"),
  ("unplanned_bugs_completed", "entry.1252702382"),
  ("unplanned_completed", "entry.485777497"),
  ("unplanned_stories_completed", "entry.370334542"),
];

/// Everything but RFC 3986 unreserved characters gets escaped.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
  .remove(b'-')
  .remove(b'.')
  .remove(b'_')
  .remove(b'~');

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w ]").expect("invalid regex"));

/// Build the form link: project name, sprint number, then every points and items counter.
pub fn form_url(data: &SprintData, form: &FormConfig) -> String {
  let mut params: Vec<String> = vec![
    format!("{}={}", PROJECT_NAME_ENTRY, encode_text(&data.project_name)),
    format!("{}={}", SPRINT_NUMBER_ENTRY, encode_text(&data.sprint_number)),
  ];

  let points = data.metrics.points.entries().map(|(name, v)| (entry_id(POINTS_ENTRIES, name), v));
  let items = data.metrics.items.entries().map(|(name, v)| (entry_id(ITEMS_ENTRIES, name), v));
  for (entry, value) in points.into_iter().chain(items) {
    match entry {
      Some(entry) => params.push(format!("{}={}", entry, value)),
      None => tracing::warn!("metric without a form entry, left out of the link"),
    }
  }

  format!("{}?{}", form.view_url, params.join("&"))
}

/// Drop punctuation, keep word characters and spaces, then percent-encode.
pub fn encode_text(raw: &str) -> String {
  let cleaned = NON_WORD.replace_all(raw, "");
  utf8_percent_encode(&cleaned, QUERY_VALUE).to_string()
}

fn entry_id(table: &[(&str, &'static str)], name: &str) -> Option<&'static str> {
  table
    .iter()
    .find(|(metric, _)| *metric == name)
    .map(|(_, entry)| *entry)
}
