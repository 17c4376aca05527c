// Copyright (c) The flaketrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The HTML dashboard renderer.
//!
//! Produces a single self-contained page: summary stat cards, classification
//! distribution and health charts, the critical-tests table, and the full
//! ranked table with client-side pagination, search, filtering and sorting.

use crate::{errors::WriteReportError, helpers::html_escape};
use camino::Utf8Path;
use chrono::Local;
use flaketrack_metadata::{AggregateStatistics, PatternClassification, TestPatternSummary};
use swrite::{swrite, SWrite};

/// How many characters of the short test name are shown in table cells. The
/// full identity is always available via the cell's `title` attribute.
const NAME_DISPLAY_LIMIT: usize = 60;

static STYLES: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body {
    font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    min-height: 100vh;
    padding: 20px;
}
.container { max-width: 1600px; margin: 0 auto; }
.header {
    background: white;
    padding: 30px;
    border-radius: 15px;
    box-shadow: 0 10px 30px rgba(0,0,0,0.2);
    margin-bottom: 30px;
}
.header h1 { color: #333; font-size: 2.5em; margin-bottom: 10px; }
.header .subtitle { color: #666; font-size: 1.1em; }
.header .timestamp { color: #999; font-size: 0.9em; margin-top: 10px; }
.stats-grid {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
    gap: 20px;
    margin-bottom: 30px;
}
.stat-card {
    background: white;
    padding: 25px;
    border-radius: 15px;
    box-shadow: 0 5px 15px rgba(0,0,0,0.1);
    transition: transform 0.3s ease, box-shadow 0.3s ease;
}
.stat-card:hover { transform: translateY(-5px); box-shadow: 0 8px 25px rgba(0,0,0,0.15); }
.stat-card .label {
    color: #666;
    font-size: 0.9em;
    margin-bottom: 10px;
    text-transform: uppercase;
    letter-spacing: 1px;
}
.stat-card .value { color: #333; font-size: 2.5em; font-weight: bold; }
.stat-card.critical { border-left: 5px solid #e74c3c; }
.stat-card.warning { border-left: 5px solid #f39c12; }
.stat-card.success { border-left: 5px solid #27ae60; }
.stat-card.info { border-left: 5px solid #3498db; }
.charts-grid {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(500px, 1fr));
    gap: 30px;
    margin-bottom: 30px;
}
.chart-container {
    background: white;
    padding: 25px;
    border-radius: 15px;
    box-shadow: 0 5px 15px rgba(0,0,0,0.1);
}
.chart-container h3 { color: #333; margin-bottom: 20px; font-size: 1.3em; }
.table-container {
    background: white;
    padding: 30px;
    border-radius: 15px;
    box-shadow: 0 5px 15px rgba(0,0,0,0.1);
    overflow-x: auto;
    margin-bottom: 30px;
}
.table-controls {
    display: flex;
    justify-content: space-between;
    align-items: center;
    margin-bottom: 25px;
    flex-wrap: wrap;
    gap: 15px;
}
.table-controls h3 { color: #333; font-size: 1.5em; margin: 0; }
.controls-right { display: flex; gap: 15px; align-items: center; flex-wrap: wrap; }
.search-box, .filter-select {
    padding: 12px 20px;
    border: 2px solid #ddd;
    border-radius: 25px;
    font-size: 14px;
    transition: all 0.3s ease;
}
.search-box { width: 280px; }
.filter-select { background: white; cursor: pointer; }
.search-box:focus, .filter-select:focus {
    outline: none;
    border-color: #667eea;
    box-shadow: 0 0 0 3px rgba(102, 126, 234, 0.1);
}
table { width: 100%; border-collapse: collapse; }
th {
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    color: white;
    padding: 16px;
    text-align: left;
    font-weight: 600;
    cursor: pointer;
    user-select: none;
    position: sticky;
    top: 0;
    z-index: 10;
}
th:hover { background: linear-gradient(135deg, #5568d3 0%, #65408b 100%); }
th .sort-icon { font-size: 12px; margin-left: 8px; opacity: 0.7; }
td { padding: 14px 16px; border-bottom: 1px solid #eee; color: #333; }
tr:hover { background: #f8f9fa; }
.badge {
    padding: 6px 14px;
    border-radius: 20px;
    font-size: 0.85em;
    font-weight: 600;
    display: inline-block;
}
.badge.critical { background: #fee; color: #e74c3c; }
.badge.warning { background: #fef5e7; color: #f39c12; }
.badge.success { background: #eafaf1; color: #27ae60; }
.badge.info { background: #ebf5fb; color: #3498db; }
.pagination-container {
    display: flex;
    justify-content: space-between;
    align-items: center;
    margin-top: 25px;
    padding-top: 20px;
    border-top: 2px solid #eee;
    flex-wrap: wrap;
    gap: 15px;
}
.page-info { color: #666; font-size: 14px; font-weight: 500; }
.pagination { display: flex; gap: 8px; align-items: center; }
.page-btn {
    padding: 8px 14px;
    border: 2px solid #ddd;
    background: white;
    border-radius: 8px;
    cursor: pointer;
    font-size: 14px;
    font-weight: 500;
    transition: all 0.3s ease;
}
.page-btn:hover:not(:disabled) { background: #667eea; color: white; border-color: #667eea; }
.page-btn.active { background: #667eea; color: white; border-color: #667eea; }
.page-btn:disabled { opacity: 0.5; cursor: not-allowed; }
.no-results { text-align: center; padding: 40px; color: #999; font-size: 1.1em; }
.footer {
    background: white;
    padding: 25px;
    border-radius: 15px;
    box-shadow: 0 5px 15px rgba(0,0,0,0.1);
    text-align: center;
    color: #666;
    margin-top: 30px;
}
@media (max-width: 768px) {
    .table-controls { flex-direction: column; align-items: stretch; }
    .controls-right { flex-direction: column; width: 100%; }
    .search-box, .filter-select { width: 100%; }
    .pagination-container { flex-direction: column; align-items: center; }
}
"#;

// Everything below reads the chart data and table rows rendered into the
// page; no report values are recomputed client-side.
static SCRIPT: &str = r#"
const distCtx = document.getElementById('distributionChart').getContext('2d');
new Chart(distCtx, {
    type: 'doughnut',
    data: {
        labels: DIST_LABELS,
        datasets: [{
            data: DIST_COUNTS,
            backgroundColor: ['#e74c3c', '#f39c12', '#f1948a', '#7fb3d5', '#27ae60', '#aeb6bf']
        }]
    },
    options: {
        responsive: true,
        maintainAspectRatio: true,
        plugins: { legend: { position: 'bottom', labels: { padding: 15, font: { size: 12 } } } }
    }
});

const healthCtx = document.getElementById('healthChart').getContext('2d');
new Chart(healthCtx, {
    type: 'bar',
    data: {
        labels: ['Healthy Tests', 'Problematic Tests', 'Health Score %'],
        datasets: [{
            label: 'Test Suite Health',
            data: [HEALTHY_COUNT, PROBLEM_COUNT, HEALTH_SCORE],
            backgroundColor: ['#27ae60', '#e74c3c', '#3498db']
        }]
    },
    options: {
        responsive: true,
        maintainAspectRatio: true,
        scales: { y: { beginAtZero: true } },
        plugins: { legend: { display: false } }
    }
});

let currentPage = 1;
let itemsPerPage = 25;
let allRows = [];
let filteredRows = [];
let currentSort = { column: -1, ascending: true };

document.addEventListener('DOMContentLoaded', function() {
    allRows = Array.from(document.querySelectorAll('#testTableBody .test-row'));
    filteredRows = [...allRows];
    updateDisplay();

    document.getElementById('searchInput').addEventListener('input', handleSearch);
    document.getElementById('filterSelect').addEventListener('change', handleFilter);
    document.getElementById('itemsPerPage').addEventListener('change', handleItemsPerPageChange);
});

function handleSearch(e) {
    const searchTerm = e.target.value.toLowerCase();
    filteredRows = allRows.filter(row =>
        row.dataset.name.toLowerCase().includes(searchTerm)
    );
    currentPage = 1;
    updateDisplay();
}

function handleFilter(e) {
    const filterValue = e.target.value;
    if (filterValue === 'all') {
        filteredRows = [...allRows];
    } else {
        filteredRows = allRows.filter(row =>
            row.dataset.classification === filterValue
        );
    }
    currentPage = 1;
    updateDisplay();
}

function handleItemsPerPageChange(e) {
    const value = e.target.value;
    itemsPerPage = value === 'all' ? filteredRows.length : parseInt(value);
    currentPage = 1;
    updateDisplay();
}

function sortTable(columnIndex) {
    const ascending = currentSort.column === columnIndex ? !currentSort.ascending : true;
    currentSort = { column: columnIndex, ascending };

    filteredRows.sort((a, b) => {
        let aValue, bValue;
        switch (columnIndex) {
            case 0:
                aValue = a.dataset.name.toLowerCase();
                bValue = b.dataset.name.toLowerCase();
                break;
            case 1:
                aValue = a.dataset.classification;
                bValue = b.dataset.classification;
                break;
            case 2:
                aValue = parseFloat(a.dataset.failureRate);
                bValue = parseFloat(b.dataset.failureRate);
                break;
            case 3:
                aValue = parseInt(a.dataset.failCount);
                bValue = parseInt(b.dataset.failCount);
                break;
            case 4:
                aValue = parseFloat(a.dataset.confidence);
                bValue = parseFloat(b.dataset.confidence);
                break;
        }
        if (aValue < bValue) return ascending ? -1 : 1;
        if (aValue > bValue) return ascending ? 1 : -1;
        return 0;
    });

    updateDisplay();
}

function updateDisplay() {
    const start = (currentPage - 1) * itemsPerPage;
    const pageRows = filteredRows.slice(start, start + itemsPerPage);

    const tbody = document.getElementById('testTableBody');
    tbody.innerHTML = '';

    if (pageRows.length === 0) {
        tbody.innerHTML =
            '<tr><td colspan="5" class="no-results">No tests found matching your criteria</td></tr>';
    } else {
        pageRows.forEach(row => tbody.appendChild(row.cloneNode(true)));
    }

    updatePaginationInfo();
    updatePaginationButtons();
}

function updatePaginationInfo() {
    const start = (currentPage - 1) * itemsPerPage + 1;
    const end = Math.min(start + itemsPerPage - 1, filteredRows.length);
    document.getElementById('pageInfo').textContent =
        `Showing ${start}-${end} of ${filteredRows.length} tests`;
}

function updatePaginationButtons() {
    const totalPages = Math.ceil(filteredRows.length / itemsPerPage);
    const pagination = document.getElementById('pagination');
    pagination.innerHTML = '';

    pagination.appendChild(createPageButton('← Prev', currentPage - 1, currentPage === 1));

    const maxButtons = 7;
    let startPage = Math.max(1, currentPage - Math.floor(maxButtons / 2));
    let endPage = Math.min(totalPages, startPage + maxButtons - 1);
    if (endPage - startPage < maxButtons - 1) {
        startPage = Math.max(1, endPage - maxButtons + 1);
    }

    if (startPage > 1) {
        pagination.appendChild(createPageButton('1', 1, false));
        if (startPage > 2) pagination.appendChild(createEllipsis());
    }
    for (let i = startPage; i <= endPage; i++) {
        pagination.appendChild(createPageButton(i, i, false, i === currentPage));
    }
    if (endPage < totalPages) {
        if (endPage < totalPages - 1) pagination.appendChild(createEllipsis());
        pagination.appendChild(createPageButton(totalPages, totalPages, false));
    }

    pagination.appendChild(
        createPageButton('Next →', currentPage + 1, currentPage === totalPages)
    );
}

function createEllipsis() {
    const ellipsis = document.createElement('span');
    ellipsis.textContent = '...';
    ellipsis.className = 'page-btn';
    ellipsis.style.border = 'none';
    ellipsis.style.cursor = 'default';
    return ellipsis;
}

function createPageButton(text, page, disabled, active = false) {
    const btn = document.createElement('button');
    btn.textContent = text;
    btn.className = 'page-btn' + (active ? ' active' : '');
    btn.disabled = disabled;
    if (!disabled) {
        btn.onclick = () => {
            currentPage = page;
            updateDisplay();
        };
    }
    return btn;
}
"#;

fn badge_class(classification: PatternClassification) -> &'static str {
    match classification {
        PatternClassification::ConsistentlyFailing => "critical",
        PatternClassification::Flaky | PatternClassification::MostlyFailing => "warning",
        PatternClassification::Stable => "success",
        PatternClassification::MostlyStable | PatternClassification::InsufficientData => "info",
    }
}

fn display_name(row: &TestPatternSummary) -> String {
    html_escape(&row.short_name().chars().take(NAME_DISPLAY_LIMIT).collect::<String>())
}

fn swrite_row_cells(out: &mut String, row: &TestPatternSummary) {
    swrite!(
        out,
        "<td title=\"{}\">{}</td>",
        html_escape(&row.identity),
        display_name(row)
    );
    swrite!(
        out,
        "<td><span class=\"badge {}\">{}</span></td>",
        badge_class(row.classification),
        row.classification
    );
    swrite!(out, "<td>{:.1}%</td>", row.failure_rate);
    swrite!(out, "<td>{}/{}</td>", row.fail_count, row.total_runs);
    swrite!(out, "<td>{:.1}%</td>", row.confidence_score);
}

/// Renders the full dashboard page.
pub fn render_dashboard(
    stats: &AggregateStatistics,
    rows: &[TestPatternSummary],
    critical: &[TestPatternSummary],
) -> String {
    let mut out = String::with_capacity(64 * 1024);

    swrite!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>flaketrack dashboard</title>\n\
         <script src=\"https://cdn.jsdelivr.net/npm/chart.js@3.9.1/dist/chart.min.js\"></script>\n\
         <style>{STYLES}</style>\n</head>\n<body>\n<div class=\"container\">\n"
    );

    // Header.
    swrite!(
        out,
        "<div class=\"header\">\n\
         <h1>Test Pattern Detection Dashboard</h1>\n\
         <div class=\"subtitle\">Automated flaky and failed test analysis</div>\n\
         <div class=\"timestamp\">Generated: {}</div>\n</div>\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    // Stat cards.
    swrite!(out, "<div class=\"stats-grid\">\n");
    for (style, label, value) in [
        ("info", "Total Tests", stats.total_tests),
        ("critical", "Consistently Failing", stats.failing_tests),
        ("warning", "Flaky Tests", stats.flaky_tests),
        ("success", "Stable Tests", stats.stable_tests),
    ] {
        swrite!(
            out,
            "<div class=\"stat-card {style}\">\
             <div class=\"label\">{label}</div>\
             <div class=\"value\">{value}</div></div>\n"
        );
    }
    swrite!(out, "</div>\n");

    // Charts.
    swrite!(
        out,
        "<div class=\"charts-grid\">\n\
         <div class=\"chart-container\"><h3>Test Classification Distribution</h3>\
         <canvas id=\"distributionChart\"></canvas></div>\n\
         <div class=\"chart-container\"><h3>Health Score Overview</h3>\
         <canvas id=\"healthChart\"></canvas></div>\n</div>\n"
    );

    // Critical tests table.
    swrite!(
        out,
        "<div class=\"table-container\">\n<div class=\"table-controls\">\
         <h3>Critical Tests Requiring Attention ({} tests)</h3></div>\n\
         <table>\n<thead><tr><th>Test Name</th><th>Classification</th>\
         <th>Failure Rate</th><th>Failed/Total Runs</th><th>Confidence</th></tr></thead>\n\
         <tbody>\n",
        critical.len()
    );
    if critical.is_empty() {
        swrite!(
            out,
            "<tr><td colspan=\"5\" class=\"no-results\">\
             No critical tests found! Your test suite is healthy.</td></tr>\n"
        );
    } else {
        for row in critical {
            swrite!(out, "<tr>");
            swrite_row_cells(&mut out, row);
            swrite!(out, "</tr>\n");
        }
    }
    swrite!(out, "</tbody>\n</table>\n</div>\n");

    // Full ranked table with controls.
    swrite!(
        out,
        "<div class=\"table-container\">\n<div class=\"table-controls\">\n\
         <h3>Complete Test List</h3>\n<div class=\"controls-right\">\n\
         <input type=\"text\" id=\"searchInput\" class=\"search-box\" \
         placeholder=\"Search tests...\">\n\
         <select id=\"filterSelect\" class=\"filter-select\">\n\
         <option value=\"all\">All Classifications</option>\n"
    );
    for name in PatternClassification::variants() {
        swrite!(out, "<option value=\"{name}\">{name}</option>\n");
    }
    swrite!(
        out,
        "</select>\n<select id=\"itemsPerPage\" class=\"filter-select\">\n\
         <option value=\"10\">10 per page</option>\n\
         <option value=\"25\" selected>25 per page</option>\n\
         <option value=\"50\">50 per page</option>\n\
         <option value=\"100\">100 per page</option>\n\
         <option value=\"all\">Show All</option>\n</select>\n</div>\n</div>\n"
    );

    swrite!(
        out,
        "<table id=\"allTestsTable\">\n<thead><tr>\
         <th onclick=\"sortTable(0)\">Test Name <span class=\"sort-icon\">&#8645;</span></th>\
         <th onclick=\"sortTable(1)\">Classification <span class=\"sort-icon\">&#8645;</span></th>\
         <th onclick=\"sortTable(2)\">Failure Rate <span class=\"sort-icon\">&#8645;</span></th>\
         <th onclick=\"sortTable(3)\">Failed/Total Runs <span class=\"sort-icon\">&#8645;</span></th>\
         <th onclick=\"sortTable(4)\">Confidence <span class=\"sort-icon\">&#8645;</span></th>\
         </tr></thead>\n<tbody id=\"testTableBody\">\n"
    );
    for row in rows {
        swrite!(
            out,
            "<tr class=\"test-row\" data-classification=\"{}\" data-name=\"{}\" \
             data-failure-rate=\"{}\" data-fail-count=\"{}\" data-confidence=\"{}\">",
            row.classification,
            html_escape(&row.identity),
            row.failure_rate,
            row.fail_count,
            row.confidence_score
        );
        swrite_row_cells(&mut out, row);
        swrite!(out, "</tr>\n");
    }
    swrite!(
        out,
        "</tbody>\n</table>\n\
         <div class=\"pagination-container\">\
         <div class=\"page-info\" id=\"pageInfo\"></div>\
         <div class=\"pagination\" id=\"pagination\"></div></div>\n</div>\n"
    );

    // Footer.
    swrite!(
        out,
        "<div class=\"footer\"><p><strong>flaketrack</strong></p>\
         <p>Pagination &bull; Search &bull; Filtering &bull; Sorting</p></div>\n</div>\n"
    );

    // Chart data, then the static script that consumes it.
    let healthy = stats.stable_tests + stats.mostly_stable;
    let problematic = stats.flaky_tests + stats.failing_tests + stats.mostly_failing;
    swrite!(out, "<script>\nconst DIST_LABELS = [");
    for name in PatternClassification::variants() {
        swrite!(out, "'{name}', ");
    }
    swrite!(out, "];\nconst DIST_COUNTS = [");
    for classification in PatternClassification::ALL {
        swrite!(out, "{}, ", stats.count(classification));
    }
    swrite!(
        out,
        "];\nconst HEALTHY_COUNT = {healthy};\n\
         const PROBLEM_COUNT = {problematic};\n\
         const HEALTH_SCORE = {:.1};\n{SCRIPT}</script>\n</body>\n</html>\n",
        stats.health_score().unwrap_or(0.0)
    );

    out
}

/// Writes the dashboard to the given path.
pub fn write_dashboard(
    path: &Utf8Path,
    stats: &AggregateStatistics,
    rows: &[TestPatternSummary],
    critical: &[TestPatternSummary],
) -> Result<(), WriteReportError> {
    fs_err::write(path, render_dashboard(stats, rows, critical)).map_err(|error| {
        WriteReportError::Fs {
            file: path.to_path_buf(),
            error,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_row;

    fn stats_for(rows: &[TestPatternSummary]) -> AggregateStatistics {
        let mut stats = AggregateStatistics::default();
        for row in rows {
            stats.record(row.classification);
        }
        stats
    }

    #[test]
    fn dashboard_includes_rows_and_charts() {
        let rows = vec![
            sample_row("com.example.TestApi.test_flaky", PatternClassification::Flaky, 50.0),
            sample_row("com.example.TestUi.test_ok", PatternClassification::Stable, 0.0),
        ];
        let critical: Vec<_> = rows
            .iter()
            .filter(|r| r.classification.is_critical())
            .cloned()
            .collect();

        let html = render_dashboard(&stats_for(&rows), &rows, &critical);
        assert!(html.contains("Critical Tests Requiring Attention (1 tests)"));
        assert!(html.contains("data-classification=\"Flaky\""));
        assert!(html.contains("distributionChart"));
        assert!(html.contains("const DIST_COUNTS"));
        assert!(html.contains("sortTable(4)"));
    }

    #[test]
    fn identities_are_escaped() {
        let rows = vec![sample_row(
            "pkg.<script>alert(1)</script>",
            PatternClassification::Stable,
            0.0,
        )];
        let html = render_dashboard(&stats_for(&rows), &rows, &[]);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn empty_critical_section_shows_placeholder() {
        let rows = vec![sample_row("a.t", PatternClassification::Stable, 0.0)];
        let html = render_dashboard(&stats_for(&rows), &rows, &[]);
        assert!(html.contains("No critical tests found"));
    }
}
