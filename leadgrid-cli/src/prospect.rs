//! The prospect record shown by the demo grid.

use chrono::NaiveDate;
use leadgrid_lib::grid::Alignment;
use leadgrid_lib::grid::CellValue;
use leadgrid_lib::grid::Column;
use leadgrid_lib::grid::Columns;
use leadgrid_lib::grid::GridRow;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prospect {
    pub id: String,
    pub name: String,
    pub company_id: String,
    pub company: String,
    pub status: String,
    pub in_group: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub score: i64,
    pub created_at: NaiveDate,
}

impl GridRow for Prospect {
    fn id(&self) -> String {
        self.id.clone()
    }
}

pub fn columns() -> Columns<Prospect> {
    Columns::new()
        .with(Column::new("name", "Name", |p: &Prospect| p.name.as_str().into()).sortable().width(18))
        .with(Column::new("company", "Company", |p: &Prospect| p.company.as_str().into()).sortable().width(14))
        .with(Column::new("status", "Status", |p: &Prospect| p.status.as_str().into()).sortable().width(10))
        .with(Column::new("tags", "Tags", |p: &Prospect| CellValue::Text(p.tags.join(", "))).width(20))
        .with(
            Column::new("score", "Score", |p: &Prospect| p.score.into())
                .sortable()
                .align(Alignment::Right)
                .width(5),
        )
        .with(Column::new("created_at", "Created", |p: &Prospect| p.created_at.into()).sortable().width(10))
}
