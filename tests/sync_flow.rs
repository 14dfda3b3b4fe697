use chrono::Utc;
use crux_core::testing::AppTester;
use crux_http::testing::ResponseBuilder;
use crux_http::Error as HttpError;
use taxdesk_core::{
    App, Category, CategoryId, Effect, Event, Gender, Model, Record, RecordId, ViewState,
};

fn record(id: &str, name: &str, country: &str, country_id: &str) -> Record {
    Record {
        id: RecordId::new(id),
        name: name.into(),
        gender: Gender::Female,
        country: country.into(),
        country_id: Some(CategoryId::new(country_id)),
        request_date: chrono::DateTime::parse_from_rfc3339("2025-06-05T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc),
    }
}

fn category(id: &str, name: &str) -> Category {
    Category {
        id: CategoryId::new(id),
        name: name.into(),
    }
}

fn load(app: &AppTester<App, Effect>, model: &mut Model) {
    app.update(Event::AppStarted, model);
    app.update(
        Event::RecordsFetched(Ok(ResponseBuilder::ok()
            .body(vec![
                record("1", "marie curie", "France", "c1"),
                record("2", "rosalind franklin", "Spain", "c2"),
            ])
            .build())),
        model,
    );
    app.update(
        Event::CategoriesFetched(Ok(ResponseBuilder::ok()
            .body(vec![category("c1", "France"), category("c2", "Spain")])
            .build())),
        model,
    );
}

#[test]
fn load_then_filter_then_inline_change() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    // 1. Joint load completes and the table renders in load order.
    load(&app, &mut model);
    let view = app.view(&model);
    let ViewState::Ready { rows, .. } = view.state else {
        panic!("expected ready state");
    };
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "Marie Curie");
    assert_eq!(rows[1].country, "Spain");

    // 2. Filter down to Spain.
    app.update(
        Event::FilterToggled {
            category_id: CategoryId::new("c2"),
        },
        &mut model,
    );
    let ViewState::Ready { rows, .. } = app.view(&model).state else {
        panic!("expected ready state");
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "2");

    // 3. Inline-change record 1 to Spain; it becomes visible under the
    //    active filter before the write is confirmed.
    let update = app.update(
        Event::InlineCountryChanged {
            record_id: RecordId::new("1"),
            category_id: CategoryId::new("c2"),
        },
        &mut model,
    );
    assert!(update.effects.iter().any(|e| matches!(e, Effect::Http(_))));

    let ViewState::Ready { rows, .. } = app.view(&model).state else {
        panic!("expected ready state");
    };
    assert_eq!(rows.len(), 2);

    // 4. The remote write is confirmed; nothing changes visibly.
    let mutation_id = model.mutations.iter().next().unwrap().mutation_id.clone();
    let confirmed = model.store.get(&RecordId::new("1")).unwrap().clone();
    app.update(
        Event::InlineUpdateResponse {
            record_id: RecordId::new("1"),
            mutation_id,
            result: Box::new(Ok(ResponseBuilder::ok().body(confirmed).build())),
        },
        &mut model,
    );
    assert!(model.mutations.is_empty());
    assert!(app.view(&model).error.is_none());
}

#[test]
fn failed_inline_change_reverts_and_reports() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    load(&app, &mut model);

    let before = model.store.get(&RecordId::new("1")).unwrap().clone();
    assert_eq!(before.country, "France");

    app.update(
        Event::InlineCountryChanged {
            record_id: RecordId::new("1"),
            category_id: CategoryId::new("c2"),
        },
        &mut model,
    );
    assert_eq!(
        model.store.get(&RecordId::new("1")).unwrap().country,
        "Spain"
    );

    let mutation_id = model.mutations.iter().next().unwrap().mutation_id.clone();
    app.update(
        Event::InlineUpdateResponse {
            record_id: RecordId::new("1"),
            mutation_id,
            result: Box::new(Err(HttpError::Timeout)),
        },
        &mut model,
    );

    // Exact rollback plus exactly one user-visible error.
    assert_eq!(model.store.get(&RecordId::new("1")), Some(&before));
    let view = app.view(&model);
    assert_eq!(
        view.error.as_deref(),
        Some("Failed to update country, reverted.")
    );
    assert!(view.toast.is_none());

    // The next action clears the stale banner.
    app.update(
        Event::InlineCountryChanged {
            record_id: RecordId::new("2"),
            category_id: CategoryId::new("c1"),
        },
        &mut model,
    );
    assert!(app.view(&model).error.is_none());
}

#[test]
fn load_failure_shows_blocking_message_and_recovers_on_reload() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(Event::AppStarted, &mut model);
    app.update(Event::CategoriesFetched(Err(HttpError::Timeout)), &mut model);

    let ViewState::Failed { message } = app.view(&model).state else {
        panic!("expected failed state");
    };
    assert_eq!(message, "Failed to load data. Please try again.");

    // Records arriving after the failure must not produce a partial table.
    app.update(
        Event::RecordsFetched(Ok(ResponseBuilder::ok()
            .body(vec![record("1", "marie curie", "France", "c1")])
            .build())),
        &mut model,
    );
    assert!(matches!(app.view(&model).state, ViewState::Failed { .. }));

    load(&app, &mut model);
    assert!(matches!(app.view(&model).state, ViewState::Ready { .. }));
}
