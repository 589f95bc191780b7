mod error;
mod prospect;
mod settings;
mod source;

use std::fs::File;
use std::path::PathBuf;

use leadgrid_lib::filter::ActiveFilterCounter;
use leadgrid_lib::filter::FilterStaging;
use leadgrid_lib::filter::FilterValue;
use leadgrid_lib::grid::ActionEntry;
use leadgrid_lib::grid::ActionItem;
use leadgrid_lib::grid::ActionOutcome;
use leadgrid_lib::grid::Alignment;
use leadgrid_lib::grid::BulkActions;
use leadgrid_lib::grid::ConfirmOptions;
use leadgrid_lib::grid::DataGrid;
use leadgrid_lib::grid::Dispatch;
use leadgrid_lib::grid::GridStatus;
use leadgrid_lib::grid::HeaderState;
use leadgrid_lib::grid::PageItem;
use leadgrid_lib::grid::SortIndicator;
use leadgrid_lib::host::QueryState;
use simplelog::Config;
use simplelog::WriteLogger;

use crate::error::Result;
use crate::prospect::Prospect;
use crate::settings::Settings;
use crate::source::ProspectSource;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let path = std::env::args().nth(1).map(PathBuf::from);
    let settings = Settings::load(path.as_deref())?;

    let log_file = File::create(&settings.log_file)?;
    WriteLogger::init(settings.level()?, Config::default(), log_file)?;

    let config = settings.grid.clone();
    let source = ProspectSource::seeded()?;
    let mut state = QueryState::new(&config);
    let mut grid = DataGrid::external(prospect::columns(), &config);
    let mut staging = FilterStaging::new(state.query(), settings.schema())?;
    let counter = ActiveFilterCounter::for_schema(&settings.schema(), &config.keys);
    let actions = bulk_actions(&source);

    println!("== First page");
    load(&mut grid, &state, &source);
    print_grid(&grid, &counter, &state);

    println!("== Next page");
    if let Some(change) = grid.next_page() {
        state.navigate(&change);
        load(&mut grid, &state, &source);
    }
    print_grid(&grid, &counter, &state);

    println!("== Filter: status=new, tags=hot|warm");
    staging.set("status", "new")?;
    staging.set("tags", FilterValue::list(["hot", "warm"]))?;
    println!("staged fields: {}", staging.dirty_fields().join(", "));
    let patch = staging.apply(&mut state);
    println!("applied: {}", serde_json::to_string(&patch)?);
    load(&mut grid, &state, &source);
    print_grid(&grid, &counter, &state);

    println!("== Sort by score, descending");
    for _ in 0..2 {
        if let Some(change) = grid.header_click("score") {
            state.set_sort(&change);
        }
    }
    load(&mut grid, &state, &source);
    print_grid(&grid, &counter, &state);

    println!("== Select page and mark contacted");
    grid.toggle_all_visible();
    print_actions(&actions, &grid);
    match actions.dispatch("mark_contacted", grid.selection())? {
        Dispatch::Executed(outcome) => print_outcome("mark_contacted", &outcome),
        Dispatch::NeedsConfirmation(pending) => {
            println!("confirm: {} ({}) -> yes", pending.options.title, pending.options.message);
            if let Some(outcome) = actions.resolve(pending, true)? {
                print_outcome("mark_contacted", &outcome);
            }
        }
    }
    load(&mut grid, &state, &source);
    print_grid(&grid, &counter, &state);

    println!("== Deep link clears status");
    state.set("status", "");
    if staging.reconcile(state.query()) {
        let status = staging.value("status").and_then(FilterValue::as_str).unwrap_or_default();
        println!("status draft after reconcile: '{}'", status);
    }
    load(&mut grid, &state, &source);
    print_grid(&grid, &counter, &state);

    println!("== Reset filters");
    staging.reset(&mut state);
    load(&mut grid, &state, &source);
    print_grid(&grid, &counter, &state);

    Ok(())
}

fn bulk_actions(source: &ProspectSource) -> BulkActions {
    let contacted = source.clone();
    let lost = source.clone();
    BulkActions::new()
        .entry(
            ActionEntry::bulk("mark_contacted", "Mark contacted", move |ids: &[String]| {
                ActionOutcome::Completed {
                    affected: contacted.set_status(ids, "contacted"),
                }
            })
            .confirm(ConfirmOptions::new("Mark contacted", "Move the selected prospects to contacted?")),
        )
        .entry(ActionEntry::bulk("export", "Export", |ids: &[String]| {
            println!("export: {}", ids.join(","));
            ActionOutcome::Completed { affected: ids.len() }
        }))
        .separator()
        .entry(
            ActionEntry::bulk("mark_lost", "Mark lost", move |ids: &[String]| ActionOutcome::Completed {
                affected: lost.set_status(ids, "lost"),
            })
            .confirm(ConfirmOptions::new("Mark lost", "This hides them from the pipeline.").destructive())
            .disabled(true),
        )
}

fn load(grid: &mut DataGrid<Prospect>, state: &QueryState, source: &ProspectSource) {
    let request = state.fetch_request();
    let generation = state.generation();
    // the query may have changed sort behind the grid's back
    grid.set_sort(request.sort.clone());
    grid.set_loading(true);
    log::debug!("[cli] GET /prospects?{}", request.to_query_string(state.config()));

    let response = source.fetch(&request, state.config().first_page);
    if !state.is_current(generation) {
        log::debug!("[cli] dropping stale response for generation {}", generation);
        return;
    }
    grid.set_page_data(response.data, request.page_state(response.total, state.config().first_page));
}

fn print_grid(grid: &DataGrid<Prospect>, counter: &ActiveFilterCounter, state: &QueryState) {
    let filters = counter.count(state.query());
    let sort = grid
        .sort()
        .map(|s| format!("{} {}", s.column_id, s.direction))
        .unwrap_or_else(|| "none".into());
    println!("filters: {}  sort: {}", filters, sort);

    match grid.status() {
        GridStatus::Loading => {
            println!("(loading)\n");
            return;
        }
        GridStatus::Empty => {
            println!("(no prospects match)\n");
            return;
        }
        GridStatus::Ready => {}
    }

    let check = match grid.header_state() {
        HeaderState::Checked => "[x]",
        HeaderState::Indeterminate => "[-]",
        HeaderState::Unchecked => "[ ]",
    };
    let mut header = vec![check.to_string()];
    for column in grid.columns().iter() {
        let marker = match grid.sort_indicator(column.id()) {
            SortIndicator::Ascending => " ^",
            SortIndicator::Descending => " v",
            SortIndicator::Unsorted => "",
        };
        let width = column.meta().width.map_or(10, usize::from);
        header.push(pad(&format!("{}{}", column.header(), marker), width, column.meta().align));
    }
    println!("{}", header.join(" "));

    for (row, cells) in grid.visible_rows().into_iter().zip(grid.render_visible()) {
        let mut line = vec![if grid.is_selected(&row.id) { "[x]" } else { "[ ]" }.to_string()];
        for (column, cell) in grid.columns().iter().zip(cells) {
            let width = column.meta().width.map_or(10, usize::from);
            line.push(pad(&cell.text, width, cell.align));
        }
        println!("{}", line.join(" "));
    }

    let range = grid.pagination().row_range();
    let window: Vec<String> = grid
        .page_window()
        .into_iter()
        .map(|item| match item {
            PageItem::Page(page) if page == grid.pagination().page_index() => format!("[{}]", page + 1),
            PageItem::Page(page) => (page + 1).to_string(),
            PageItem::Ellipsis => "...".into(),
        })
        .collect();
    println!(
        "showing {}-{} of {}  {}",
        range.start + 1,
        range.end,
        grid.pagination().total_elements(),
        window.join(" ")
    );
    if grid.selected_count() > 0 {
        println!(
            "selected: {} ({} on other pages)",
            grid.selected_count(),
            grid.hidden_selected_count()
        );
    }
    println!();
}

fn print_actions(actions: &BulkActions, grid: &DataGrid<Prospect>) {
    let mut menu = Vec::new();
    for item in actions.items() {
        match item {
            ActionItem::Entry(entry) if actions.can_run(&entry.id, grid.selection()) => menu.push(entry.label.clone()),
            ActionItem::Entry(entry) => menu.push(format!("({})", entry.label)),
            ActionItem::Separator => menu.push("|".into()),
        }
    }
    println!("actions: {}", menu.join(" "));
}

fn print_outcome(id: &str, outcome: &ActionOutcome) {
    match outcome {
        ActionOutcome::Completed { affected } => println!("{}: {} prospects updated", id, affected),
        ActionOutcome::Failed { message } => println!("{} failed: {}", id, message),
    }
}

fn pad(text: &str, width: usize, align: Alignment) -> String {
    let text: String = text.chars().take(width).collect();
    match align {
        Alignment::Left => format!("{:<width$}", text),
        Alignment::Center => format!("{:^width$}", text),
        Alignment::Right => format!("{:>width$}", text),
    }
}
