//! Dashboard page
//!
//! Server-side rendering of the status page: the floor plan with both pet
//! icons placed by the [`Reconciler`], one pie chart per pet, and a meta
//! refresh that reloads the page on a fixed interval.

use std::fmt::Write;

use super::chart::render_pie_chart;
use super::error::DashboardResult;
use super::layout::{Document, Reconciler, Stage};
use crate::tracker::{PetId, TrackerSnapshot};

/// Default reload interval of the page
pub const DEFAULT_REFRESH_SECS: u64 = 5;

/// URL of the floor plan drawn behind the pet icons
pub const FLOOR_PLAN_PATH: &str = "/static/floor-plan.svg";

/// Floor plan image, room areas matching the position classes below
pub const FLOOR_PLAN_SVG: &str = include_str!("../../static/floor-plan.svg");

const STYLE: &str = r#"
body{margin:0;background:#1b1b1f;color:#e6e6e6;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif}
header{padding:16px 24px;border-bottom:1px solid #2e2e36}
header h1{margin:0;font-size:20px}
header p{margin:4px 0 0;font-size:12px;color:#8a8a99}
main{display:flex;flex-wrap:wrap;gap:24px;padding:24px}
#floor-plan{position:relative;width:600px;height:400px;background:url('/static/floor-plan.svg') center/cover,#2a2a31;border-radius:8px}
.pet{position:absolute;width:48px;height:48px;border-radius:50%;transition:all .4s}
#pet0{background:#fafafa}
#pet1{background:#111;border:2px solid #555}
.pet-living-room{top:60%;left:25%}
.pet-bedroom-small{top:15%;left:20%}
.pet-bedroom-large{top:15%;left:65%}
.pet-bathroom{top:65%;left:70%}
.pet-outside{top:88%;left:46%}
#pet0.side{margin-left:-30px}
#pet1.side{margin-left:30px}
.middle{margin-left:0}
#pet1.middle{opacity:.85}
.charts{display:flex;gap:24px}
.chart{text-align:center}
.chart h2{font-size:14px;margin:0 0 8px}
.chart .room{font-size:12px;color:#8a8a99;margin-top:6px}
"#;

/// Render the full dashboard page for one snapshot
///
/// Both pets are placed through the reconciler, pet 0 first; the classes
/// emitted are exactly the ones the reconciler left on the document.
pub fn render_dashboard(snapshot: &TrackerSnapshot, refresh_secs: u64) -> DashboardResult<String> {
    let mut doc = Document::with_pets();
    let mut reconciler = Reconciler::new();
    for pet in PetId::ALL {
        reconciler.set_pet_room(&mut doc, pet, snapshot.pet(pet).room_located)?;
    }

    let mut html = String::new();
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<meta http-equiv="refresh" content="{refresh_secs}">
<title>Pet Tracker</title>
<style>{STYLE}</style>
</head>
<body>
<header><h1>Pet Tracker</h1><p>{updated}</p></header>
<main>
<div id="floor-plan">
"#,
        updated = match snapshot.updated_at {
            Some(ts) => format!("Last update: {}", ts.format("%Y-%m-%d %H:%M:%S UTC")),
            None => "Waiting for room sensors".to_string(),
        }
    );

    for pet in PetId::ALL {
        let id = pet.image_id();
        let classes = doc
            .element(id)
            .map(ToString::to_string)
            .unwrap_or_default();
        let _ = writeln!(
            html,
            r#"<div id="{id}" class="{classes}" title="{title}"></div>"#,
            title = reconciler.room(pet).display_name()
        );
    }

    html.push_str("</div>\n<div class=\"charts\">\n");

    for pet in PetId::ALL {
        let status = snapshot.pet(pet);
        let chart = render_pie_chart(pet.chart_id(), &status.time_spent_percentage);
        let _ = writeln!(
            html,
            r#"<div class="chart"><h2>Pet {n}</h2>{svg}<div class="room">{room}</div></div>"#,
            n = pet.index(),
            svg = chart.to_svg(),
            room = status.room_located.display_name()
        );
    }

    html.push_str("</div>\n</main>\n</body>\n</html>\n");
    Ok(html)
}
