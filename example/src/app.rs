use tessera_components::{
    alignment::CrossAxisAlignment,
    column::{ColumnArgs, column},
    modifier::ModifierExt as _,
    spacer::{SpacerArgs, spacer},
    surface::{SurfaceArgs, SurfaceStyle, surface},
    text::{TextArgs, text},
    theme::{MaterialTheme, material_theme},
};
use tessera_datetime_picker::date_time_picker::{
    DateTimePickerArgs, DateTimePickerState, date_time_picker,
};
use tessera_ui::{Dp, Modifier, remember, tessera, use_context};

#[tessera]
pub fn app() {
    material_theme(MaterialTheme::default, || {
        select_date_time();
    });
}

#[tessera]
fn select_date_time() {
    let state = remember(DateTimePickerState::default);
    let scheme = use_context::<MaterialTheme>()
        .expect("MaterialTheme must be provided")
        .get()
        .color_scheme;

    surface(&SurfaceArgs::with_child(
        SurfaceArgs::default()
            .modifier(Modifier::new().fill_max_size())
            .style(SurfaceStyle::Filled {
                color: scheme.surface_container_low,
            }),
        move || {
            column(
                ColumnArgs::default()
                    .modifier(Modifier::new().fill_max_size().padding_all(Dp(24.0)))
                    .cross_axis_alignment(CrossAxisAlignment::Center),
                move |scope| {
                    scope.child(move || {
                        let label = state.with(|s| s.formatted());
                        text(
                            &TextArgs::default()
                                .text(label)
                                .size(Dp(16.0))
                                .color(scheme.on_surface),
                        );
                    });
                    scope.child(|| {
                        spacer(&SpacerArgs::new(Modifier::new().height(Dp(50.0))));
                    });
                    scope.child(move || {
                        date_time_picker(
                            &DateTimePickerArgs::default()
                                .modifier(Modifier::new().fill_max_width())
                                .state(state),
                        );
                    });
                },
            );
        },
    ));
}
