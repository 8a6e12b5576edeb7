// src/templates/plugin.rs
use bevy::prelude::*;

use super::events::{
    RequestApplyTemplate, RequestCreateMapping, RequestRemoveMapping, RequestResetMappings,
    RequestTemplateExport, RequestTemplateFetch, TemplateFetchCompleted,
};
use super::resources::{CommittedTemplate, MappingSession, TemplateGridState};
use super::systems;
use crate::sow::plugin::SowSystemSet;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
enum TemplateSystemSet {
    Fetch,
    Mapping,
    Export,
}

/// Template loading, the field-to-cell mapping session and template export.
pub struct TemplatesPlugin;

impl Plugin for TemplatesPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                TemplateSystemSet::Fetch,
                TemplateSystemSet::Mapping.after(TemplateSystemSet::Fetch),
                TemplateSystemSet::Export
                    .after(TemplateSystemSet::Mapping)
                    .after(SowSystemSet::ApplyChanges),
            ),
        );

        app.init_resource::<TemplateGridState>()
            .init_resource::<MappingSession>()
            .init_resource::<CommittedTemplate>();

        app.add_event::<RequestTemplateFetch>()
            .add_event::<TemplateFetchCompleted>()
            .add_event::<RequestCreateMapping>()
            .add_event::<RequestRemoveMapping>()
            .add_event::<RequestResetMappings>()
            .add_event::<RequestApplyTemplate>()
            .add_event::<RequestTemplateExport>();

        app.add_systems(
            Update,
            (
                systems::handle_template_fetch_request,
                systems::handle_template_fetch_completed,
            )
                .chain()
                .in_set(TemplateSystemSet::Fetch),
        );
        app.add_systems(
            Update,
            (
                systems::handle_reset_mappings,
                systems::handle_remove_mapping,
                systems::handle_create_mapping,
                systems::handle_apply_template,
            )
                .chain()
                .in_set(TemplateSystemSet::Mapping),
        );
        app.add_systems(
            Update,
            systems::handle_template_export.in_set(TemplateSystemSet::Export),
        );

        info!("TemplatesPlugin initialized.");
    }
}
