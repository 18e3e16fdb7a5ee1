//! Root application component and context providers.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};

use crate::components::{
    canvas_host::CanvasHost, filter_panel::FilterPanel, layer_panel::LayerPanel, status_bar::StatusBar,
    toolbar::Toolbar,
};
use crate::state::{commands::CommandQueue, viewer::ViewerState};
use crate::util::persistence::Persisted;

/// Root application component.
///
/// Seeds the shared viewer snapshot from browser storage and provides it,
/// together with the command queue, to every panel.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let viewer = RwSignal::new(ViewerState::restored(Persisted::load()));
    let commands = RwSignal::new(CommandQueue::default());

    provide_context(viewer);
    provide_context(commands);

    view! {
        <Title text="Mission Map Viewer"/>

        <div class="viewer-shell">
            <Toolbar/>
            <div class="viewer-body">
                <aside class="viewer-sidebar">
                    <LayerPanel/>
                    <FilterPanel/>
                </aside>
                <main class="viewer-main">
                    <CanvasHost/>
                </main>
            </div>
            <StatusBar/>
        </div>
    }
}
