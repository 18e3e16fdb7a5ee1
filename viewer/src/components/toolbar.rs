//! Top bar: mission directory, edit-mode controls and selection actions.

use leptos::prelude::*;

use crate::state::commands::{Command, CommandQueue};
use crate::state::viewer::{LoadStatus, ViewerState};

/// Top toolbar.
///
/// Loading is disabled while a load is in flight; save and discard only
/// appear in edit mode and are disabled while a save is pending.
#[component]
pub fn Toolbar() -> impl IntoView {
    let viewer = expect_context::<RwSignal<ViewerState>>();
    let commands = expect_context::<RwSignal<CommandQueue>>();
    let send = move |command: Command| commands.update(|q| q.push(command));

    let mission_dir = RwSignal::new(viewer.get_untracked().mission_dir);
    Effect::new(move || {
        let loaded = viewer.with(|v| v.mission_dir.clone());
        mission_dir.set(loaded);
    });

    let loading = move || viewer.with(|v| v.load_status == LoadStatus::Loading);
    let edit_mode = move || viewer.with(|v| v.edit_mode);
    let saving = move || viewer.with(|v| v.saving);
    let dirty = move || viewer.with(|v| v.dirty);
    let selected = move || viewer.with(|v| v.selected);

    let on_load = move |_| send(Command::LoadMission(mission_dir.get_untracked()));
    let on_toggle_edit = move |_| send(Command::SetEditMode(!viewer.with_untracked(|v| v.edit_mode)));

    view! {
        <div class="toolbar">
            <input
                class="toolbar__mission-dir"
                type="text"
                placeholder="Mission directory"
                prop:value=move || mission_dir.get()
                on:input=move |ev| mission_dir.set(event_target_value(&ev))
                on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                    if ev.key() == "Enter" {
                        send(Command::LoadMission(mission_dir.get_untracked()));
                    }
                }
            />
            <button class="btn" disabled=loading on:click=on_load>
                {move || if loading() { "Loading..." } else { "Load" }}
            </button>
            <span class="toolbar__divider"></span>
            <button class="btn" on:click=move |_| send(Command::FitToView)>
                "Fit"
            </button>
            <button class="btn" disabled=move || selected() == 0 on:click=move |_| send(Command::ClearSelection)>
                "Clear selection"
            </button>
            <button class="btn" disabled=move || selected() == 0 on:click=move |_| send(Command::CopySelectedSource)>
                "Copy source"
            </button>
            <span class="toolbar__spacer"></span>
            <button
                class=move || if edit_mode() { "btn btn--active" } else { "btn" }
                disabled=saving
                on:click=on_toggle_edit
            >
                {move || if edit_mode() { "Exit edit mode" } else { "Edit spawn points" }}
            </button>
            <Show when=edit_mode>
                <button class="btn btn--primary" disabled=move || saving() || dirty() == 0 on:click=move |_| send(Command::SaveEdits)>
                    {move || if saving() { "Saving...".to_owned() } else { format!("Save ({})", dirty()) }}
                </button>
                <button class="btn" disabled=move || saving() || dirty() == 0 on:click=move |_| send(Command::DiscardEdits)>
                    "Discard"
                </button>
            </Show>
        </div>
    }
}
