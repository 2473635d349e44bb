use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::Html,
    routing::{get, post},
};
use hypertext::{Raw, prelude::*};
use serde::Deserialize;

use crate::availability::{self, StatusKind};
use crate::db::{self, DbPool};

pub fn router() -> Router<DbPool> {
    Router::new()
        .route("/", get(carwashes_index))
        .route("/list", get(carwashes_list))
        .route("/{id}", get(carwash_show))
        .route("/{id}/status", post(update_status))
}

// GET / - Customer-facing homepage: only visible carwashes
pub async fn homepage(State(pool): State<DbPool>) -> Html<String> {
    let carwashes = db::visible_carwashes(&pool).await.unwrap_or_default();

    let html = maud! {
        !DOCTYPE
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Oto Yıkama" }
                link rel="stylesheet" href="/static/system.css";
                link rel="stylesheet" href="/static/app.css";
                script src="https://unpkg.com/htmx.org@2.0.4" {}
            }
            body {
                div .homepage id="homepage" {
                    h1 { "Oto Yıkama" }

                    @if !carwashes.is_empty() {
                        section .carwash-section {
                            h2 { "Open Carwashes" }
                            div .carwash-card-grid {
                                @for carwash in &carwashes {
                                    (Raw::dangerously_create(&render_carwash_card(carwash)))
                                }
                            }
                        }
                    }

                    @if carwashes.is_empty() {
                        div .empty-state {
                            p { "No carwashes are open right now." }
                            a href="/carwashes" { "Manage Carwashes →" }
                        }
                    }

                    div .homepage-footer {
                        a href="/carwashes" { "Manage Carwashes →" }
                    }
                }
            }
        }
    };

    Html(html.render().into_inner())
}

fn render_carwash_card(carwash: &db::DbCarwash) -> String {
    let show_url = format!("/carwashes/{}", carwash.id);
    let city = carwash.city.as_deref().unwrap_or("");
    let address = carwash.address.as_deref().unwrap_or("");
    let rating = format!("★ {:.1}", carwash.average_rating);

    maud! {
        div .carwash-card {
            a .carwash-card-title href=(show_url) { (carwash.name) }
            @if !city.is_empty() {
                div .carwash-card-city { (city) }
            }
            @if !address.is_empty() {
                div .carwash-card-address { (address) }
            }
            div .carwash-card-rating { (rating) }
        }
    }
    .render()
    .into_inner()
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_sort")]
    pub sort: String,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_sort() -> String {
    "name".to_string()
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    10
}

// GET /carwashes - Full listing with visibility classification
async fn carwashes_index(State(pool): State<DbPool>, Query(query): Query<ListQuery>) -> Html<String> {
    let list_html = render_carwash_list(&pool, &query.sort, query.page, query.per_page).await;

    let html = maud! {
        !DOCTYPE
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Carwashes - Oto Yıkama" }
                link rel="stylesheet" href="/static/system.css";
                link rel="stylesheet" href="/static/app.css";
                script src="https://unpkg.com/htmx.org@2.0.4" {}
            }
            body {
                div .carwashes-page {
                    div .carwashes-page-header {
                        a href="/" { "← Home" }
                    }

                    h1 { "Carwashes" }

                    div .list-controls {
                        div .list-controls-left {
                            label for="sort-select" { "Sort by: " }
                            (Raw::dangerously_create(&render_sort_select(&query.sort)))
                            label for="per-page-select" { "Per page: " }
                            (Raw::dangerously_create(&render_per_page_select(query.per_page)))
                        }
                    }

                    div #carwash-list {
                        (Raw::dangerously_create(&list_html))
                    }
                }
            }
        }
    };

    Html(html.render().into_inner())
}

// GET /carwashes/list - Return just the list (for HTMX)
async fn carwashes_list(State(pool): State<DbPool>, Query(query): Query<ListQuery>) -> Html<String> {
    Html(render_carwash_list(&pool, &query.sort, query.page, query.per_page).await)
}

fn render_sort_select(current_sort: &str) -> String {
    let name_selected = if current_sort == "name" { " selected" } else { "" };
    let city_selected = if current_sort == "city" { " selected" } else { "" };

    format!(
        r##"<select id="sort-select" name="sort" hx-get="/carwashes/list" hx-target="#carwash-list" hx-swap="innerHTML" hx-trigger="change" hx-include="#per-page-select">
            <option value="name"{name_selected}>Name (A-Z)</option>
            <option value="city"{city_selected}>City</option>
        </select>"##
    )
}

fn render_per_page_select(current_per_page: i64) -> String {
    let options = [5, 10, 20, 50];
    let options_html: String = options
        .iter()
        .map(|&n| {
            let selected = if n == current_per_page { " selected" } else { "" };
            format!(r#"<option value="{n}"{selected}>{n}</option>"#)
        })
        .collect();

    format!(
        r##"<select id="per-page-select" name="per_page" hx-get="/carwashes/list" hx-target="#carwash-list" hx-swap="innerHTML" hx-trigger="change" hx-include="#sort-select">
            {options_html}
        </select>"##
    )
}

async fn render_carwash_list(pool: &DbPool, sort: &str, page: i64, per_page: i64) -> String {
    let per_page = per_page.max(1).min(100);
    let page = page.max(1);
    let offset = (page - 1) * per_page;

    let total_count = db::get_carwash_count(pool).await.unwrap_or(0);

    if total_count == 0 {
        return maud! {
            div .empty-list {
                p { "No carwashes registered yet." }
            }
        }
        .render()
        .into_inner();
    }

    let total_pages = (total_count + per_page - 1) / per_page;
    let page = page.min(total_pages);

    let carwashes = db::get_carwashes_paginated(pool, sort, offset, per_page)
        .await
        .unwrap_or_default();

    let rows: Vec<String> = carwashes.iter().map(render_carwash_row).collect();
    let pagination_html = render_pagination(page, total_pages, per_page, sort, total_count);

    maud! {
        table .carwash-table {
            thead {
                tr {
                    th { "Name" }
                    th { "City" }
                    th { "Status" }
                    th { "Active" }
                    th { "Listed" }
                }
            }
            tbody {
                (Raw::dangerously_create(&rows.join("\n")))
            }
        }
        (Raw::dangerously_create(&pagination_html))
    }
    .render()
    .into_inner()
}

fn render_carwash_row(carwash: &db::DbCarwash) -> String {
    let show_url = format!("/carwashes/{}", carwash.id);
    let city = carwash.city.as_deref().unwrap_or("—");
    let status = carwash.status.as_deref().unwrap_or("—");
    let active = match carwash.is_active {
        Some(1) => "1",
        Some(_) => "0",
        None => "—",
    };
    let listed = if carwash.is_visible() { "✓" } else { "✗" };
    let listed_class = if carwash.is_visible() {
        "carwash-listed"
    } else {
        "carwash-hidden"
    };

    maud! {
        tr {
            td { a href=(show_url) { (carwash.name) } }
            td { (city) }
            td { (status) }
            td { (active) }
            td class=(listed_class) { (listed) }
        }
    }
    .render()
    .into_inner()
}

fn render_pagination(current_page: i64, total_pages: i64, per_page: i64, sort: &str, total_count: i64) -> String {
    if total_pages <= 1 {
        return String::new();
    }

    let start_item = (current_page - 1) * per_page + 1;
    let end_item = (current_page * per_page).min(total_count);

    let prev_btn = if current_page > 1 {
        format!(
            r##"<button class="btn pagination-btn" hx-get="/carwashes/list?page={}&amp;per_page={}&amp;sort={}" hx-target="#carwash-list" hx-swap="innerHTML">‹</button>"##,
            current_page - 1,
            per_page,
            sort
        )
    } else {
        r#"<button class="btn pagination-btn" disabled>‹</button>"#.to_string()
    };

    let next_btn = if current_page < total_pages {
        format!(
            r##"<button class="btn pagination-btn" hx-get="/carwashes/list?page={}&amp;per_page={}&amp;sort={}" hx-target="#carwash-list" hx-swap="innerHTML">›</button>"##,
            current_page + 1,
            per_page,
            sort
        )
    } else {
        r#"<button class="btn pagination-btn" disabled>›</button>"#.to_string()
    };

    format!(
        r#"<div class="pagination">
            <div class="pagination-info">Showing {}-{} of {}</div>
            <div class="pagination-controls">
                {}
                <span class="pagination-page">{} / {}</span>
                {}
            </div>
        </div>"#,
        start_item, end_item, total_count, prev_btn, current_page, total_pages, next_btn
    )
}

// GET /carwashes/:id - Show page for a single carwash
async fn carwash_show(State(pool): State<DbPool>, Path(id): Path<i64>) -> Html<String> {
    let Some(carwash) = db::get_carwash(&pool, id).await.ok().flatten() else {
        return Html(format!(
            "<!DOCTYPE html><html><head><title>Not Found</title></head><body><h1>Carwash {} not found</h1><a href=\"/carwashes\">Back to Carwashes</a></body></html>",
            id
        ));
    };

    let services = db::services_for_carwash(&pool, id).await.unwrap_or_default();
    let bookings = db::recent_bookings_for_carwash(&pool, id, 10).await.unwrap_or_default();

    Html(render_show_page(&carwash, &services, &bookings))
}

fn render_show_page(
    carwash: &db::DbCarwash,
    services: &[db::DbService],
    bookings: &[db::BookingSummary],
) -> String {
    let status_fragment = render_status_panel(carwash);
    let services_html = render_services_list(services);
    let bookings_html = render_bookings_list(bookings);
    let rating = format!("★ {:.1}", carwash.average_rating);
    let address = carwash.address.as_deref().unwrap_or("");
    let city = carwash.city.as_deref().unwrap_or("");
    let phone = carwash.phone.as_deref().unwrap_or("");
    let updated_at = carwash.updated_at.as_deref().unwrap_or("");

    maud! {
        !DOCTYPE
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (carwash.name) " - Oto Yıkama" }
                link rel="stylesheet" href="/static/system.css";
                link rel="stylesheet" href="/static/app.css";
                script src="https://unpkg.com/htmx.org@2.0.4" {}
            }
            body {
                div .carwash-show-page id="carwash-show-page" {
                    div .carwash-show-header {
                        a href="/" { "← Home" }
                        " | "
                        a href="/carwashes" { "Carwashes" }
                    }

                    h1 { (carwash.name) }

                    div .carwash-show-info {
                        @if !address.is_empty() {
                            div .carwash-show-info-row {
                                strong { "Address: " }
                                span { (address) }
                            }
                        }
                        @if !city.is_empty() {
                            div .carwash-show-info-row {
                                strong { "City: " }
                                span { (city) }
                            }
                        }
                        @if !phone.is_empty() {
                            div .carwash-show-info-row {
                                strong { "Phone: " }
                                span { (phone) }
                            }
                        }
                        div .carwash-show-info-row {
                            strong { "Rating: " }
                            span { (rating) }
                        }
                        @if !updated_at.is_empty() {
                            div .carwash-show-info-row {
                                strong { "Updated: " }
                                span { (updated_at) }
                            }
                        }
                    }

                    (Raw::dangerously_create(&status_fragment))

                    section .carwash-show-section {
                        h2 { "Services" }
                        (Raw::dangerously_create(&services_html))
                    }

                    section .carwash-show-section {
                        h2 { "Recent Bookings" }
                        (Raw::dangerously_create(&bookings_html))
                    }
                }
            }
        }
    }
    .render()
    .into_inner()
}

// Status panel with the open/close toggle. Swapped via htmx on toggle.
fn render_status_panel(carwash: &db::DbCarwash) -> String {
    let status = carwash.status.as_deref().unwrap_or("—");
    let kind_label = match carwash.status_kind() {
        StatusKind::Unknown => "unrecognized token",
        kind => kind.label(),
    };
    let listed = if carwash.is_visible() {
        "Shown in customer listing"
    } else {
        "Hidden from customer listing"
    };
    let is_active = carwash
        .is_active
        .map(|v| v.to_string())
        .unwrap_or_else(|| "—".to_string());
    let status_url = format!("/carwashes/{}/status", carwash.id);

    let open_btn = format!(
        r##"<button class="btn status-btn" hx-post="{}" hx-vals='{{"status": "{}"}}' hx-target="#status-panel" hx-swap="outerHTML">Aç</button>"##,
        status_url,
        availability::STATUS_OPEN
    );
    let close_btn = format!(
        r##"<button class="btn status-btn" hx-post="{}" hx-vals='{{"status": "{}"}}' hx-target="#status-panel" hx-swap="outerHTML">Kapat</button>"##,
        status_url,
        availability::STATUS_CLOSED
    );

    maud! {
        section .carwash-status-panel id="status-panel" {
            h2 { "Status" }
            div .carwash-show-info-row {
                strong { "Stored status: " }
                span { (status) " (" (kind_label) ")" }
            }
            div .carwash-show-info-row {
                strong { "is_active: " }
                span { (is_active) }
            }
            div .carwash-show-info-row {
                strong { (listed) }
            }
            div .status-controls {
                (Raw::dangerously_create(&open_btn))
                (Raw::dangerously_create(&close_btn))
            }
        }
    }
    .render()
    .into_inner()
}

fn render_services_list(services: &[db::DbService]) -> String {
    if services.is_empty() {
        return maud! {
            div .services-empty {
                p { "No services registered." }
            }
        }
        .render()
        .into_inner();
    }

    let items: Vec<String> = services
        .iter()
        .map(|s| {
            let price = format!("{:.2} ₺", s.price);
            let duration = format!("{} min", s.duration);
            maud! {
                li .service-item {
                    span .service-name { (s.name) }
                    span .service-price { (price) }
                    span .service-duration { (duration) }
                }
            }
            .render()
            .into_inner()
        })
        .collect();

    maud! {
        ul .services-list {
            (Raw::dangerously_create(&items.join("\n")))
        }
    }
    .render()
    .into_inner()
}

fn render_bookings_list(bookings: &[db::BookingSummary]) -> String {
    if bookings.is_empty() {
        return maud! {
            div .bookings-empty {
                p { "No bookings recorded yet." }
            }
        }
        .render()
        .into_inner();
    }

    let items: Vec<String> = bookings
        .iter()
        .map(|b| {
            let when = format!("{} {}", b.booking_date, b.booking_time);
            let service = b.service_name.as_deref().unwrap_or("—");
            let plate = b.vehicle_plate.as_deref().unwrap_or("—");
            let price = format!("{:.2} ₺", b.total_price);
            maud! {
                li .booking-item {
                    span .booking-when { (when) }
                    span .booking-service { (service) }
                    span .booking-plate { (plate) }
                    span .booking-status { (b.status) }
                    span .booking-price { (price) }
                }
            }
            .render()
            .into_inner()
        })
        .collect();

    maud! {
        ul .bookings-list {
            (Raw::dangerously_create(&items.join("\n")))
        }
    }
    .render()
    .into_inner()
}

#[derive(Deserialize, Debug)]
pub struct StatusForm {
    pub status: String,
}

// POST /carwashes/:id/status - Apply a canonicalized status toggle
async fn update_status(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> Html<String> {
    // Unknown tokens are rejected rather than stored, so writes stay canonical.
    let Some((status, is_active)) = availability::canonical_status(&form.status) else {
        return Html(format!(
            "<section class=\"carwash-status-panel\" id=\"status-panel\"><p class=\"status-error\">Invalid status token: '{}'</p></section>",
            form.status
        ));
    };

    if let Err(e) = db::set_carwash_status(&pool, id, Some(status), is_active).await {
        eprintln!("Error updating carwash {} status: {}", id, e);
    }

    match db::get_carwash(&pool, id).await.ok().flatten() {
        Some(carwash) => Html(render_status_panel(&carwash)),
        None => Html(format!(
            "<section class=\"carwash-status-panel\" id=\"status-panel\"><p class=\"status-error\">Carwash {} not found</p></section>",
            id
        )),
    }
}
