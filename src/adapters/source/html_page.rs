//! Implements ScheduleSourcePort for a saved "My Class Schedule" page (List View).
//!
//! Page structure: one `.PSGROUPBOXWBO` box per course, titled by `.PAGROUPDIVIDER`
//! (`CS 135 - Designing Functional Programs`), with meeting rows in `.PSLEVEL3GRID tr`.
//! Cells are located by id fragments since the numeric suffixes change per row.

use crate::domain::{DomainError, RawScheduleRow, ScheduleSnapshot};
use crate::ports::ScheduleSourcePort;
use scraper::{ElementRef, Html, Selector};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

const SCHEDULE_PAGE_TITLE: &str = "My Class Schedule";

/// Saved schedule page on disk.
pub struct HtmlScheduleSource {
    path: PathBuf,
    /// Used when the page has no person-name element (saved fragments).
    student_name: Option<String>,
}

impl HtmlScheduleSource {
    pub fn new(path: impl AsRef<Path>, student_name: Option<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            student_name,
        }
    }

    /// Extract rows and the student's name from page markup.
    pub fn parse(html: &str) -> Result<ScheduleSnapshot, DomainError> {
        let doc = Html::parse_document(html);

        if let Some(title) = doc.select(&selector(".PATRANSACTIONTITLE")?).next() {
            let title = text_of(title);
            if !title.starts_with(SCHEDULE_PAGE_TITLE) {
                return Err(DomainError::Source(format!(
                    "expected the {:?} page, found {:?}",
                    SCHEDULE_PAGE_TITLE, title
                )));
            }
        }

        let student_name = doc
            .select(&selector("#DERIVED_SSTSNAV_PERSON_NAME")?)
            .next()
            .map(text_of)
            .filter(|name| !name.is_empty());

        let fields = RowSelectors::new()?;
        let group_sel = selector(".PSGROUPBOXWBO")?;
        let divider_sel = selector(".PAGROUPDIVIDER")?;
        let row_sel = selector(".PSLEVEL3GRID tr")?;

        let mut rows = Vec::new();
        for group in doc.select(&group_sel) {
            let title = group.select(&divider_sel).next().map(text_of).unwrap_or_default();
            let (course_code, course_name) = match title.split_once(" - ") {
                Some((code, name)) => (code.trim().to_string(), name.trim().to_string()),
                None => (title.clone(), String::new()),
            };

            // Continuation rows leave class/section/component blank; they belong to the row above.
            let mut current_class = ClassIds::default();
            for tr in group.select(&row_sel) {
                let Some(days_times) = fields.text(tr, &fields.schedule) else {
                    continue;
                };
                let ids = ClassIds {
                    class_number: fields.text(tr, &fields.class_number).unwrap_or_default(),
                    section: fields.text(tr, &fields.section).unwrap_or_default(),
                    component: fields.text(tr, &fields.component).unwrap_or_default(),
                };
                if ids.class_number.is_empty() {
                    debug!(course = %course_code, "continuation row inherits class ids");
                } else {
                    current_class = ids;
                }

                rows.push(RawScheduleRow {
                    days_times,
                    start_end_date: fields.text(tr, &fields.dates).unwrap_or_default(),
                    room: fields.text(tr, &fields.room).unwrap_or_default(),
                    instructor: fields.text(tr, &fields.instructor).unwrap_or_default(),
                    course_code: course_code.clone(),
                    course_name: course_name.clone(),
                    section: current_class.section.clone(),
                    component: current_class.component.clone(),
                    class_number: current_class.class_number.clone(),
                });
            }
        }

        Ok(ScheduleSnapshot { student_name, rows })
    }
}

#[async_trait::async_trait]
impl ScheduleSourcePort for HtmlScheduleSource {
    async fn load_schedule(&self) -> Result<ScheduleSnapshot, DomainError> {
        let html = fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::Source(format!("read {}: {}", self.path.display(), e))
        })?;
        let mut snapshot = Self::parse(&html)?;
        if snapshot.student_name.is_none() {
            snapshot.student_name = self.student_name.clone();
        }
        info!(
            path = %self.path.display(),
            rows = snapshot.rows.len(),
            "parsed schedule page"
        );
        Ok(snapshot)
    }
}

#[derive(Debug, Default)]
struct ClassIds {
    class_number: String,
    section: String,
    component: String,
}

/// Per-row cell selectors, matched by id fragment.
struct RowSelectors {
    class_number: Selector,
    section: Selector,
    component: Selector,
    schedule: Selector,
    room: Selector,
    instructor: Selector,
    dates: Selector,
}

impl RowSelectors {
    fn new() -> Result<Self, DomainError> {
        Ok(Self {
            class_number: selector("span[id*='DERIVED_CLS_DTL_CLASS_NBR']")?,
            section: selector("a[id*='MTG_SECTION']")?,
            component: selector("span[id*='MTG_COMP']")?,
            schedule: selector("span[id*='MTG_SCHED']")?,
            room: selector("span[id*='MTG_LOC']")?,
            instructor: selector("span[id*='DERIVED_CLS_DTL_SSR_INSTR_LONG']")?,
            dates: selector("span[id*='MTG_DATES']")?,
        })
    }

    /// Text of the first matching cell, `None` if the row has no such cell.
    fn text(&self, row: ElementRef<'_>, sel: &Selector) -> Option<String> {
        row.select(sel).next().map(text_of)
    }
}

fn selector(css: &str) -> Result<Selector, DomainError> {
    Selector::parse(css).map_err(|e| DomainError::Source(format!("selector {:?}: {:?}", css, e)))
}

/// Element text with `&nbsp;` folded to spaces and the ends trimmed.
fn text_of(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .replace('\u{a0}', " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
  <span id="DERIVED_SSTSNAV_PERSON_NAME">Jane Q Doe</span>
  <div class="PATRANSACTIONTITLE">My Class Schedule</div>
  <div class="PSGROUPBOXWBO">
    <div class="PAGROUPDIVIDER">CS 135 - Designing Functional Programs</div>
    <table class="PSLEVEL3GRID">
      <tr><th>Class Nbr</th><th>Section</th><th>Component</th><th>Days &amp; Times</th></tr>
      <tr>
        <td><span id="DERIVED_CLS_DTL_CLASS_NBR$0">5678</span></td>
        <td><a id="MTG_SECTION$0">001</a></td>
        <td><span id="MTG_COMP$0">LEC</span></td>
        <td><span id="MTG_SCHED$0">MWF 1:00PM - 1:50PM</span></td>
        <td><span id="MTG_LOC$0">MC  2065</span></td>
        <td><span id="DERIVED_CLS_DTL_SSR_INSTR_LONG$0">Jane Smith</span></td>
        <td><span id="MTG_DATES$0">01/05/2015 - 04/10/2015</span></td>
      </tr>
      <tr>
        <td><span id="DERIVED_CLS_DTL_CLASS_NBR$1">&nbsp;</span></td>
        <td><a id="MTG_SECTION$1"></a></td>
        <td><span id="MTG_COMP$1">&nbsp;</span></td>
        <td><span id="MTG_SCHED$1">Th 4:30PM - 5:20PM</span></td>
        <td><span id="MTG_LOC$1">MC 4020</span></td>
        <td><span id="DERIVED_CLS_DTL_SSR_INSTR_LONG$1">Staff</span></td>
        <td><span id="MTG_DATES$1">01/08/2015 - 04/09/2015</span></td>
      </tr>
    </table>
  </div>
  <div class="PSGROUPBOXWBO">
    <div class="PAGROUPDIVIDER">MATH 135 - Algebra for Honours Mathematics</div>
    <table class="PSLEVEL3GRID">
      <tr>
        <td><span id="DERIVED_CLS_DTL_CLASS_NBR$2">6012</span></td>
        <td><a id="MTG_SECTION$2">101</a></td>
        <td><span id="MTG_COMP$2">TUT</span></td>
        <td><span id="MTG_SCHED$2">TBA</span></td>
        <td><span id="MTG_LOC$2">TBA</span></td>
        <td><span id="DERIVED_CLS_DTL_SSR_INSTR_LONG$2">To be Announced</span></td>
        <td><span id="MTG_DATES$2">01/05/2015 - 04/10/2015</span></td>
      </tr>
    </table>
  </div>
</body></html>
"#;

    #[test]
    fn test_parse_rows_and_name() {
        let snapshot = HtmlScheduleSource::parse(PAGE).unwrap();
        assert_eq!(snapshot.student_name.as_deref(), Some("Jane Q Doe"));
        assert_eq!(snapshot.rows.len(), 3);

        let lec = &snapshot.rows[0];
        assert_eq!(lec.course_code, "CS 135");
        assert_eq!(lec.course_name, "Designing Functional Programs");
        assert_eq!(lec.class_number, "5678");
        assert_eq!(lec.section, "001");
        assert_eq!(lec.component, "LEC");
        assert_eq!(lec.days_times, "MWF 1:00PM - 1:50PM");
        assert_eq!(lec.start_end_date, "01/05/2015 - 04/10/2015");
        assert_eq!(lec.instructor, "Jane Smith");
    }

    #[test]
    fn test_continuation_row_inherits_class_ids() {
        let snapshot = HtmlScheduleSource::parse(PAGE).unwrap();
        let extra = &snapshot.rows[1];
        assert_eq!(extra.class_number, "5678");
        assert_eq!(extra.section, "001");
        assert_eq!(extra.component, "LEC");
        assert_eq!(extra.days_times, "Th 4:30PM - 5:20PM");
        assert_eq!(extra.room, "MC 4020");
    }

    #[test]
    fn test_class_ids_reset_per_course() {
        let snapshot = HtmlScheduleSource::parse(PAGE).unwrap();
        let tut = &snapshot.rows[2];
        assert_eq!(tut.course_code, "MATH 135");
        assert_eq!(tut.class_number, "6012");
        assert_eq!(tut.days_times, "TBA");
    }

    #[test]
    fn test_wrong_page_is_rejected() {
        let html = r#"<div class="PATRANSACTIONTITLE">Shopping Cart</div>"#;
        assert!(matches!(
            HtmlScheduleSource::parse(html),
            Err(DomainError::Source(_))
        ));
    }

    #[test]
    fn test_page_without_groups() {
        let snapshot = HtmlScheduleSource::parse("<html><body></body></html>").unwrap();
        assert!(snapshot.rows.is_empty());
        assert_eq!(snapshot.student_name, None);
    }

    #[tokio::test]
    async fn test_configured_name_fills_in_for_fragment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fragment.html");
        let fragment = PAGE.replace(
            r#"<span id="DERIVED_SSTSNAV_PERSON_NAME">Jane Q Doe</span>"#,
            "",
        );
        std::fs::write(&path, fragment).unwrap();

        let source = HtmlScheduleSource::new(&path, Some("Configured Name".into()));
        let snapshot = source.load_schedule().await.unwrap();
        assert_eq!(snapshot.student_name.as_deref(), Some("Configured Name"));
        assert_eq!(snapshot.rows.len(), 3);
    }

    #[tokio::test]
    async fn test_page_name_wins_over_configured_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.html");
        std::fs::write(&path, PAGE).unwrap();

        let source = HtmlScheduleSource::new(&path, Some("Configured Name".into()));
        let snapshot = source.load_schedule().await.unwrap();
        assert_eq!(snapshot.student_name.as_deref(), Some("Jane Q Doe"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let source = HtmlScheduleSource::new("/nonexistent/schedule.html", None);
        assert!(matches!(
            source.load_schedule().await,
            Err(DomainError::Source(_))
        ));
    }
}
