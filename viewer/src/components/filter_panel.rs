//! Filter builder and the list of active filters per category.

use leptos::prelude::*;
use mapview::filter::FilterCategory;

use crate::state::commands::{Command, CommandQueue};
use crate::state::filter_form::{
    FilterDraft, category_key, category_label, describe, dimension_key, dimensions_for, parse_category,
    parse_dimension,
};
use crate::state::viewer::ViewerState;

const CATEGORIES: [FilterCategory; 3] =
    [FilterCategory::Markers, FilterCategory::EventSpawns, FilterCategory::Territories];

#[component]
pub fn FilterPanel() -> impl IntoView {
    let viewer = expect_context::<RwSignal<ViewerState>>();
    let commands = expect_context::<RwSignal<CommandQueue>>();
    let send = move |command: Command| commands.update(|q| q.push(command));

    let draft = RwSignal::new(FilterDraft::default());

    let on_add = move |_| {
        let result = draft.try_update(FilterDraft::submit);
        match result {
            Some(Ok(spec)) => send(Command::AddFilter(spec)),
            Some(Err(err)) => viewer.update(|v| {
                v.error(&err);
            }),
            None => {}
        }
    };

    let value_options = move || {
        let (category, dimension) = draft.with(|d| (d.category, d.dimension));
        viewer
            .with(|v| v.values_for(category, dimension).to_vec())
            .into_iter()
            .map(|value| {
                let checked = {
                    let value = value.clone();
                    move || draft.with(|d| d.values.contains(&value))
                };
                let toggle = value.clone();
                view! {
                    <label class="filter-panel__value">
                        <input
                            type="checkbox"
                            prop:checked=checked
                            on:change=move |_| draft.update(|d| d.toggle_value(&toggle))
                        />
                        {value}
                    </label>
                }
            })
            .collect_view()
    };

    let dimension_options = move || {
        let category = draft.with(|d| d.category);
        dimensions_for(category)
            .map(|dimension| {
                view! {
                    <option
                        value=dimension_key(dimension)
                        selected=move || draft.with(|d| d.dimension == dimension)
                    >
                        {dimension.label()}
                    </option>
                }
            })
            .collect_view()
    };

    let active_filters = move || {
        CATEGORIES
            .into_iter()
            .filter(|category| viewer.with(|v| v.filters_for(*category).next().is_some()))
            .map(|category| {
                let chips = viewer.with(|v| {
                    v.filters_for(category).map(|(position, spec)| (position, describe(spec))).collect::<Vec<_>>()
                });
                view! {
                    <div class="filter-panel__group">
                        <div class="filter-panel__group-head">
                            <span>{category_label(category)}</span>
                            <button class="btn btn--small" on:click=move |_| send(Command::ClearFilters(Some(category)))>
                                "Clear"
                            </button>
                        </div>
                        {chips
                            .into_iter()
                            .map(|(position, text)| {
                                view! {
                                    <div class="filter-panel__chip">
                                        <span>{text}</span>
                                        <button
                                            class="btn btn--small"
                                            title="Invert"
                                            on:click=move |_| send(Command::ToggleFilterInvert { category, position })
                                        >
                                            "Invert"
                                        </button>
                                        <button
                                            class="btn btn--small btn--danger"
                                            title="Remove"
                                            on:click=move |_| send(Command::RemoveFilter { category, position })
                                        >
                                            "×"
                                        </button>
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>
                }
            })
            .collect_view()
    };

    let has_filters = move || viewer.with(|v| !v.filters.is_empty());

    view! {
        <div class="filter-panel">
            <h3 class="filter-panel__title">"Filters"</h3>
            <select on:change=move |ev| {
                if let Some(category) = parse_category(&event_target_value(&ev)) {
                    draft.update(|d| d.set_category(category));
                }
            }>
                {CATEGORIES
                    .into_iter()
                    .map(|category| {
                        view! {
                            <option
                                value=category_key(category)
                                selected=move || draft.with(|d| d.category == category)
                            >
                                {category_label(category)}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
            <select on:change=move |ev| {
                if let Some(dimension) = parse_dimension(&event_target_value(&ev)) {
                    draft.update(|d| d.set_dimension(dimension));
                }
            }>{dimension_options}</select>
            <div class="filter-panel__values">{value_options}</div>
            <label class="filter-panel__invert">
                <input
                    type="checkbox"
                    prop:checked=move || draft.with(|d| d.invert)
                    on:change=move |ev| {
                        let invert = event_target_checked(&ev);
                        draft.update(|d| d.invert = invert);
                    }
                />
                "Hide matching"
            </label>
            <button class="btn" on:click=on_add>
                "Add filter"
            </button>

            {active_filters}
            <Show when=has_filters>
                <button class="btn btn--danger" on:click=move |_| send(Command::ClearFilters(None))>
                    "Clear all filters"
                </button>
            </Show>
        </div>
    }
}
