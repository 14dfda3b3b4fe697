use crux_core::render::Render;
use crux_http::Http;
use tracing::{debug, warn};

use crate::api;
use crate::event::Event;
use crate::filter;
use crate::model::{Category, LoadPhase, Model, MutationId, Record, RecordId};
use crate::view::{self, CategoryOption, ToastView, ViewModel, ViewState};
use crate::{AppError, ErrorKind};

#[derive(Default)]
pub struct App;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub http: Http<Event>,
}

/// One half of the joint initial load.
enum LoadPart {
    Records(Vec<Record>),
    Categories(Vec<Category>),
}

impl App {
    /// Turns an HTTP completion into either its decoded body or a diagnostic
    /// string. Transport errors, non-2xx statuses and undecodable bodies are
    /// all treated identically (the remote store exposes no structured error
    /// codes).
    fn decode_body<T>(result: crux_http::Result<crux_http::Response<T>>) -> Result<T, String> {
        match result {
            Ok(mut response) if response.status().is_success() => response
                .take_body()
                .ok_or_else(|| "response body was empty".to_string()),
            Ok(response) => Err(format!("unexpected status {}", response.status())),
            Err(err) => Err(err.to_string()),
        }
    }

    fn start_load(model: &mut Model, caps: &Capabilities) {
        model.begin_load();

        caps.http
            .get(api::records_url())
            .expect_json::<Vec<Record>>()
            .send(Event::RecordsFetched);
        caps.http
            .get(api::categories_url())
            .expect_json::<Vec<Category>>()
            .send(Event::CategoriesFetched);

        caps.render.render();
    }

    /// Records one half of the load; initializes the store only once both
    /// halves have arrived, so a half-loaded cycle is never observable.
    fn apply_load_part(model: &mut Model, part: LoadPart) {
        let LoadPhase::Loading {
            records,
            categories,
        } = &mut model.phase
        else {
            debug!("load response outside an active load cycle; ignoring");
            return;
        };

        match part {
            LoadPart::Records(list) => *records = Some(list),
            LoadPart::Categories(list) => *categories = Some(list),
        }

        if matches!(
            model.phase,
            LoadPhase::Loading {
                records: Some(_),
                categories: Some(_),
            }
        ) {
            if let LoadPhase::Loading {
                records: Some(records),
                categories: Some(categories),
            } = std::mem::replace(&mut model.phase, LoadPhase::Ready)
            {
                if let Err(err) = model.store.initialize(records, categories) {
                    warn!(%err, "store rejected the load result");
                    model.phase = LoadPhase::Failed;
                    model.set_error(AppError::new(ErrorKind::Load, err.to_string()));
                }
            }
        }
    }

    fn fail_load(model: &mut Model, detail: String) {
        warn!(detail = %detail, "load cycle failed");
        if !matches!(model.phase, LoadPhase::Failed) {
            model.phase = LoadPhase::Failed;
            model.set_error(AppError::new(ErrorKind::Load, detail));
        }
    }

    fn send_inline_update(optimistic: &Record, mutation_id: &MutationId, caps: &Capabilities) {
        let record_id = optimistic.id.clone();
        let mutation_id = mutation_id.clone();

        caps.http
            .put(api::record_url(&optimistic.id))
            .body_json(optimistic)
            .expect("record body should serialize")
            .expect_json::<Record>()
            .send(move |result| Event::InlineUpdateResponse {
                record_id: record_id.clone(),
                mutation_id: mutation_id.clone(),
                result: Box::new(result),
            });
    }

    fn send_edit_save(patch: &Record, caps: &Capabilities) {
        caps.http
            .put(api::record_url(&patch.id))
            .body_json(patch)
            .expect("record body should serialize")
            .expect_json::<Record>()
            .send(|result| Event::EditSaveResponse {
                result: Box::new(result),
            });
    }

    fn handle_inline_response(
        record_id: &RecordId,
        mutation_id: &MutationId,
        result: crux_http::Result<crux_http::Response<Record>>,
        model: &mut Model,
    ) {
        match Self::decode_body(result) {
            Ok(_confirmed) => {
                // The instigating caller's optimistic value is canonical once
                // accepted; the response body does not overwrite the store.
                if !model.mutations.commit(mutation_id) {
                    warn!(%mutation_id, "confirmation for an unknown mutation");
                }
            }
            Err(detail) => {
                warn!(%record_id, detail = %detail, "inline update failed, rolling back");
                if model.mutations.rollback(mutation_id, &mut model.store) {
                    model.set_error(AppError::new(ErrorKind::UpdateFailed, detail));
                }
            }
        }
    }

    fn handle_edit_save_response(
        result: crux_http::Result<crux_http::Response<Record>>,
        model: &mut Model,
    ) {
        match Self::decode_body(result) {
            Ok(server_record) => {
                let id = server_record.id.clone();
                if let Err(err) = model.store.replace(&id, server_record) {
                    warn!(%err, "saved record is missing from the store");
                }
                if model.edit.complete_save() {
                    model.show_toast("Customer updated successfully.");
                }
            }
            Err(detail) => {
                warn!(detail = %detail, "modal save failed");
                if model.edit.fail_save() {
                    model.set_error(AppError::new(ErrorKind::SaveFailed, detail));
                }
            }
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        model.touch();
        debug!(event = event.name(), "handling event");

        match event {
            Event::AppStarted | Event::ReloadRequested => {
                Self::start_load(model, caps);
            }

            Event::RecordsFetched(result) => {
                match Self::decode_body(result) {
                    Ok(list) => Self::apply_load_part(model, LoadPart::Records(list)),
                    Err(detail) => Self::fail_load(model, detail),
                }
                caps.render.render();
            }

            Event::CategoriesFetched(result) => {
                match Self::decode_body(result) {
                    Ok(list) => Self::apply_load_part(model, LoadPart::Categories(list)),
                    Err(detail) => Self::fail_load(model, detail),
                }
                caps.render.render();
            }

            Event::FilterToggled { category_id } => {
                model.toggle_filter(category_id);
                caps.render.render();
            }

            Event::FilterCleared => {
                model.filter.clear();
                caps.render.render();
            }

            Event::InlineCountryChanged {
                record_id,
                category_id,
            } => {
                // Unknown ids mean there is nothing to do, not an error: the
                // editing UI can only offer ids it was handed.
                let Some(category) = model.store.category(&category_id).cloned() else {
                    warn!(%category_id, "inline change for an unknown category; ignoring");
                    return;
                };
                let Some(previous) = model.store.get(&record_id).cloned() else {
                    warn!(%record_id, "inline change for an unknown record; ignoring");
                    return;
                };

                let mutation_id = model.mutations.begin(&previous, &category, model.now_ms);
                let optimistic = previous.with_category(&category);

                if let Err(err) = model.store.replace(&record_id, optimistic.clone()) {
                    warn!(%err, "optimistic replace failed");
                    model.mutations.commit(&mutation_id);
                    return;
                }

                // A new action supersedes any stale error banner.
                model.clear_error();
                caps.render.render();

                Self::send_inline_update(&optimistic, &mutation_id, caps);
            }

            Event::InlineUpdateResponse {
                record_id,
                mutation_id,
                result,
            } => {
                Self::handle_inline_response(&record_id, &mutation_id, *result, model);
                caps.render.render();
            }

            Event::EditRequested { record_id } => {
                let Some(record) = model.store.get(&record_id).cloned() else {
                    warn!(%record_id, "edit requested for an unknown record; ignoring");
                    return;
                };
                if model.edit.open(&record, model.store.categories()) {
                    caps.render.render();
                } else {
                    debug!("an edit session is already active; ignoring open");
                }
            }

            Event::EditNameChanged { name } => {
                if model.edit.edit_name(name) {
                    caps.render.render();
                }
            }

            Event::EditCountryChanged { category_id } => {
                if model.edit.edit_country(category_id) {
                    caps.render.render();
                }
            }

            Event::EditSubmitted => {
                let Some(patch) = model.edit.begin_save(model.store.categories()) else {
                    debug!("commit is not available; ignoring submit");
                    return;
                };
                model.clear_error();
                caps.render.render();

                Self::send_edit_save(&patch, caps);
            }

            Event::EditCancelled => {
                if model.edit.cancel() {
                    caps.render.render();
                }
            }

            Event::EditSaveResponse { result } => {
                Self::handle_edit_save_response(*result, model);
                caps.render.render();
            }

            Event::DismissError => {
                model.clear_error();
                caps.render.render();
            }

            Event::DismissToast => {
                model.clear_toast();
                caps.render.render();
            }

            Event::TimerTick => {
                if let Some(toast) = &model.active_toast {
                    if toast.is_expired(model.now_ms) {
                        model.clear_toast();
                        caps.render.render();
                    }
                }
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        let state = match &model.phase {
            LoadPhase::Idle | LoadPhase::Loading { .. } => ViewState::Loading,

            LoadPhase::Failed => ViewState::Failed {
                message: model.active_error.as_ref().map_or_else(
                    || "Failed to load data. Please try again.".to_string(),
                    |e| e.user_facing_message().to_string(),
                ),
            },

            LoadPhase::Ready => {
                let visible = filter::visible(
                    model.store.records(),
                    model.store.categories(),
                    &model.filter,
                );
                let rows: Vec<_> = visible
                    .into_iter()
                    .map(|r| view::record_row(r, model.store.categories()))
                    .collect();
                let filter_active = !model.filter.is_empty();
                let no_matches = filter_active && rows.is_empty();

                ViewState::Ready {
                    rows,
                    filter_active,
                    no_matches,
                }
            }
        };

        let countries = model
            .store
            .categories()
            .iter()
            .map(|c| CategoryOption {
                id: c.id.as_str().to_string(),
                name: c.name.clone(),
                selected: model.filter.contains(&c.id),
            })
            .collect();

        ViewModel {
            state,
            countries,
            modal: view::edit_modal(&model.edit),
            error: model
                .active_error
                .as_ref()
                .map(|e| e.user_facing_message().to_string()),
            toast: model.active_toast.as_ref().map(ToastView::from),
        }
    }
}
