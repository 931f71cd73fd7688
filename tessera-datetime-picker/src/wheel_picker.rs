//! A wheel-style picker column for selecting one value from a list.
//!
//! ## Usage
//!
//! Show a scrollable strip of labeled values that snaps to the row at the
//! center of the window and reports it when scrolling comes to rest.
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use derive_setters::Setters;
use tessera_ui::{
    CallbackWith, Color, ComputedData, Constraint, CursorEventContent, DimensionValue, Dp,
    FrameNanosControl, MeasurementError, Modifier, PressKeyEventType, Px, PxPosition,
    ScrollEventSource, State,
    layout::{LayoutInput, LayoutOutput, LayoutSpec, RenderInput},
    key, receive_frame_nanos, remember, tessera, use_context,
};

use tessera_components::{
    alignment::Alignment,
    modifier::ModifierExt as _,
    pos_misc::is_position_in_component,
    surface::{SurfaceArgs, SurfaceStyle, surface},
    text::{TextArgs, text},
    theme::MaterialTheme,
};

/// Number of rows visible in the wheel window.
const VISIBLE_ROWS: usize = 5;
/// Rows kept above and below the centered row inside the window.
const PADDING_ROWS: usize = 2;
const DEFAULT_ROW_HEIGHT: Dp = Dp(50.0);
const DEFAULT_ROW_WIDTH: Dp = Dp(50.0);
const DEFAULT_SCROLL_SMOOTHING: f32 = 0.12;
const SETTLE_IDLE_TIME: Duration = Duration::from_millis(120);
const FLING_DECAY_CONSTANT: f32 = 5.0;
const FLING_MIN_VELOCITY: f32 = 10.0;
const FLING_START_THRESHOLD: f32 = 50.0;
const FLING_MAX_VELOCITY: f32 = 6000.0;
const VELOCITY_SAMPLE_WINDOW: Duration = Duration::from_millis(90);
const VELOCITY_IDLE_CUTOFF: Duration = Duration::from_millis(65);

/// One selectable row of a wheel picker: an integer value and its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelOption {
    value: i32,
    label: String,
}

impl WheelOption {
    /// Creates an option from a value and its display label.
    pub fn new(value: i32, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }

    /// Returns the option value.
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Returns the display label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Interaction phase of a wheel picker column.
///
/// Taps are honored only while `Idle`; the change callback fires exactly
/// once per `Settling` -> `Idle` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WheelPhase {
    /// The wheel is at rest.
    #[default]
    Idle,
    /// The pointer is moving the wheel.
    Dragging,
    /// The wheel is coasting after a release.
    Settling,
}

#[derive(Clone, PartialEq)]
struct WheelVelocityTracker {
    samples: VecDeque<(Instant, f32)>,
    last_sample_time: Instant,
}

impl WheelVelocityTracker {
    fn new(now: Instant) -> Self {
        Self {
            samples: VecDeque::new(),
            last_sample_time: now,
        }
    }

    fn push_delta(&mut self, now: Instant, delta: f32) {
        let delta_time = now.duration_since(self.last_sample_time).as_secs_f32();
        self.last_sample_time = now;
        if delta_time <= 0.0 {
            return;
        }

        let velocity = clamp_fling_velocity(delta / delta_time);
        self.samples.push_back((now, velocity));
        self.prune(now);
    }

    fn resolve(&mut self, now: Instant) -> Option<f32> {
        self.prune(now);

        if self.samples.is_empty() {
            return None;
        }

        let idle_time = now.duration_since(self.last_sample_time);

        let mut weighted_sum = 0.0f32;
        let mut total_weight = 0.0f32;
        let window_secs = VELOCITY_SAMPLE_WINDOW.as_secs_f32().max(f32::EPSILON);

        for &(timestamp, velocity) in &self.samples {
            let age_secs = now
                .duration_since(timestamp)
                .as_secs_f32()
                .clamp(0.0, window_secs);
            let weight = (window_secs - age_secs).max(0.0);
            if weight > 0.0 {
                weighted_sum += velocity * weight;
                total_weight += weight;
            }
        }

        if total_weight <= f32::EPSILON {
            self.samples.clear();
            return None;
        }

        let average = weighted_sum / total_weight;
        let damping = 1.0 - idle_time.as_secs_f32() / VELOCITY_IDLE_CUTOFF.as_secs_f32();
        Some(clamp_fling_velocity(average * damping.clamp(0.0, 1.0)))
    }

    fn prune(&mut self, now: Instant) {
        while let Some(&(timestamp, _)) = self.samples.front() {
            if now.duration_since(timestamp) > VELOCITY_SAMPLE_WINDOW {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }
}

fn clamp_fling_velocity(velocity: f32) -> f32 {
    if !velocity.is_finite() {
        return 0.0;
    }
    velocity.clamp(-FLING_MAX_VELOCITY, FLING_MAX_VELOCITY)
}

/// Controller for a wheel picker column.
///
/// Tracks the scroll offset, the interaction phase, and the settle
/// bookkeeping that guarantees the change notification fires exactly once
/// per settle.
#[derive(Clone, PartialEq)]
pub struct WheelPickerController {
    option_count: usize,
    row_height: Px,
    scroll_offset: f32,
    target_offset: f32,
    phase: WheelPhase,
    selected_index: usize,
    pending_settle: Option<usize>,
    awaiting_settle: bool,
    velocity: f32,
    velocity_tracker: Option<WheelVelocityTracker>,
    pointer_down: bool,
    last_pointer_position: Option<PxPosition>,
    last_fling_time: Option<Instant>,
    last_frame_time: Option<Instant>,
    last_scroll_time: Option<Instant>,
    initialized: bool,
}

impl WheelPickerController {
    /// Creates a controller with the requested initially centered row.
    pub fn new(initial_index: usize) -> Self {
        Self {
            option_count: 0,
            row_height: Px::ZERO,
            scroll_offset: 0.0,
            target_offset: 0.0,
            phase: WheelPhase::Idle,
            selected_index: initial_index,
            pending_settle: None,
            awaiting_settle: false,
            velocity: 0.0,
            velocity_tracker: None,
            pointer_down: false,
            last_pointer_position: None,
            last_fling_time: None,
            last_frame_time: None,
            last_scroll_time: None,
            initialized: false,
        }
    }

    /// Returns the current interaction phase.
    pub fn phase(&self) -> WheelPhase {
        self.phase
    }

    /// Returns the last settled row index.
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Returns the row index closest to the center of the window.
    pub fn centered_index(&self) -> usize {
        let step = self.row_step();
        if step <= f32::EPSILON || self.option_count == 0 {
            return 0;
        }
        let row_float = (-self.scroll_offset / step).round();
        if !row_float.is_finite() {
            return 0;
        }
        let max_row = self.option_count.saturating_sub(1) as f32;
        row_float.clamp(0.0, max_row) as usize
    }

    /// Jumps immediately to the requested row without animation.
    pub fn jump_to_index(&mut self, index: usize) {
        let index = self.clamp_index(index);
        self.selected_index = index;
        if self.initialized {
            let offset = self.offset_for_index(index);
            self.scroll_offset = offset;
            self.target_offset = offset;
        }
    }

    /// Animates toward the requested row without firing the change callback.
    pub fn scroll_to_index(&mut self, index: usize) {
        let index = self.clamp_index(index);
        self.selected_index = index;
        if self.initialized {
            self.target_offset = self.offset_for_index(index);
        }
    }

    pub(crate) fn set_option_count(&mut self, option_count: usize) {
        self.option_count = option_count;
        if option_count == 0 {
            self.selected_index = 0;
            self.scroll_offset = 0.0;
            self.target_offset = 0.0;
            return;
        }
        if self.selected_index >= option_count {
            self.selected_index = option_count - 1;
        }
        self.scroll_offset = self.clamp_offset(self.scroll_offset);
        self.target_offset = self.clamp_offset(self.target_offset);
    }

    pub(crate) fn update_layout(&mut self, row_height: Px, option_count: usize) {
        let size_changed = row_height != self.row_height;
        self.row_height = row_height;
        self.set_option_count(option_count);

        if option_count == 0 {
            return;
        }

        if (!self.initialized || size_changed) && row_height > Px::ZERO {
            let offset = self.offset_for_index(self.selected_index);
            self.scroll_offset = offset;
            self.target_offset = offset;
            self.initialized = true;
        }
    }

    /// Re-centers on the row of an externally changed selection.
    ///
    /// Ignored while the user is interacting or a settle is still pending,
    /// so it never interferes with an in-flight gesture or snap.
    pub(crate) fn sync_selected(&mut self, index: usize) {
        let index = self.clamp_index(index);
        if !self.initialized {
            self.selected_index = index;
            return;
        }
        if self.phase != WheelPhase::Idle
            || self.pointer_down
            || self.awaiting_settle
            || self.pending_settle.is_some()
            || index == self.selected_index
        {
            return;
        }
        self.jump_to_index(index);
    }

    pub(crate) fn handle_scroll(&mut self, delta: f32, is_touch: bool, timestamp: Instant) {
        if self.option_count == 0 || self.row_step() <= f32::EPSILON {
            return;
        }
        self.velocity = 0.0;
        self.scroll_offset = self.clamp_offset(self.scroll_offset + delta);
        self.target_offset = self.scroll_offset;
        self.awaiting_settle = true;
        if is_touch {
            self.phase = WheelPhase::Dragging;
            self.push_velocity_sample(timestamp, delta);
        } else {
            self.phase = WheelPhase::Idle;
            self.last_scroll_time = Some(timestamp);
        }
    }

    pub(crate) fn press(&mut self, position: Option<PxPosition>, timestamp: Instant) {
        // A touch on a coasting wheel catches it. The pending settle is
        // kept alive through the idle path in case no drag follows.
        if self.phase == WheelPhase::Settling {
            self.velocity = 0.0;
            self.phase = WheelPhase::Idle;
            self.last_scroll_time = Some(timestamp);
        }
        self.pointer_down = true;
        self.last_pointer_position = position;
    }

    pub(crate) fn release(&mut self, timestamp: Instant) {
        self.pointer_down = false;
        self.last_pointer_position = None;
        let tracker = self.velocity_tracker.take();
        if self.phase != WheelPhase::Dragging {
            return;
        }

        let velocity = tracker.and_then(|mut tracker| tracker.resolve(timestamp));
        match velocity {
            Some(velocity) if velocity.abs() > FLING_START_THRESHOLD => {
                self.velocity = velocity;
                self.phase = WheelPhase::Settling;
                self.last_fling_time = Some(timestamp);
            }
            _ => self.finish_settle(),
        }
    }

    pub(crate) fn is_pointer_down(&self) -> bool {
        self.pointer_down
    }

    pub(crate) fn pointer_drag_delta(&mut self, position: PxPosition) -> Option<f32> {
        let last = self.last_pointer_position?;
        self.last_pointer_position = Some(position);
        Some((position.y - last.y).to_f32())
    }

    pub(crate) fn apply_drag_delta(&mut self, delta: f32, now: Instant) {
        self.handle_scroll(delta, true, now);
    }

    /// Returns true when a tap on a row should fire the change callback.
    pub(crate) fn accepts_tap(&self) -> bool {
        self.phase == WheelPhase::Idle && !self.awaiting_settle
    }

    pub(crate) fn tick(&mut self, now: Instant, smoothing: f32) {
        if self.option_count == 0 || self.row_step() <= f32::EPSILON {
            return;
        }

        if self.phase == WheelPhase::Settling {
            self.advance_fling(now);
        }

        if self.awaiting_settle
            && self.phase == WheelPhase::Idle
            && !self.pointer_down
            && self
                .last_scroll_time
                .map(|t| now.duration_since(t) >= SETTLE_IDLE_TIME)
                .unwrap_or(false)
        {
            self.finish_settle();
        }

        self.animate_toward_target(now, smoothing);
    }

    /// Takes the row index of a completed settle, at most once per settle.
    pub(crate) fn take_settled(&mut self) -> Option<usize> {
        self.pending_settle.take()
    }

    pub(crate) fn has_pending_animation_frame(&self) -> bool {
        self.phase == WheelPhase::Settling
            || self.awaiting_settle
            || (self.target_offset - self.scroll_offset).abs() >= f32::EPSILON
    }

    pub(crate) fn scroll_offset_px(&self) -> Px {
        Px::saturating_from_f32(self.scroll_offset)
    }

    fn advance_fling(&mut self, now: Instant) {
        let Some(last) = self.last_fling_time else {
            self.last_fling_time = Some(now);
            return;
        };
        let delta_time = now.duration_since(last).as_secs_f32();
        if delta_time <= 0.0 {
            return;
        }
        self.last_fling_time = Some(now);

        let delta = self.velocity * delta_time;
        let previous = self.scroll_offset;
        self.scroll_offset = self.clamp_offset(previous + delta);
        self.target_offset = self.scroll_offset;
        let consumed = self.scroll_offset - previous;
        if (consumed - delta).abs() > f32::EPSILON {
            // Hit an end of the list.
            self.velocity = 0.0;
        }

        self.velocity *= (-FLING_DECAY_CONSTANT * delta_time).exp();
        if self.velocity.abs() < FLING_MIN_VELOCITY {
            self.velocity = 0.0;
            self.finish_settle();
        }
    }

    fn finish_settle(&mut self) {
        if !self.awaiting_settle {
            return;
        }
        self.awaiting_settle = false;
        self.phase = WheelPhase::Idle;
        self.velocity = 0.0;
        self.last_scroll_time = None;
        let index = self.centered_index();
        self.selected_index = index;
        self.pending_settle = Some(index);
        // Corrective snap toward the exact center of the settled row.
        self.target_offset = self.offset_for_index(index);
    }

    fn animate_toward_target(&mut self, now: Instant, smoothing: f32) {
        let delta_time = if let Some(last) = self.last_frame_time {
            now.duration_since(last).as_secs_f32()
        } else {
            1.0 / 60.0
        };
        self.last_frame_time = Some(now);

        let diff = self.target_offset - self.scroll_offset;
        if diff.abs() < 0.5 {
            self.scroll_offset = self.target_offset;
            return;
        }

        let mut movement_factor = (1.0 - smoothing.clamp(0.0, 1.0)) * delta_time * 60.0;
        if movement_factor > 1.0 {
            movement_factor = 1.0;
        }
        self.scroll_offset += diff * movement_factor;
    }

    fn push_velocity_sample(&mut self, now: Instant, delta: f32) {
        let tracker = self
            .velocity_tracker
            .get_or_insert_with(|| WheelVelocityTracker::new(now));
        tracker.push_delta(now, delta);
    }

    fn row_step(&self) -> f32 {
        self.row_height.to_f32()
    }

    fn offset_for_index(&self, index: usize) -> f32 {
        -self.row_step() * index as f32
    }

    fn clamp_index(&self, index: usize) -> usize {
        if self.option_count == 0 {
            0
        } else {
            index.min(self.option_count - 1)
        }
    }

    fn clamp_offset(&self, offset: f32) -> f32 {
        if self.option_count == 0 || self.row_step() <= f32::EPSILON {
            return 0.0;
        }
        let min_offset = self.offset_for_index(self.option_count - 1);
        offset.clamp(min_offset, 0.0)
    }
}

impl Default for WheelPickerController {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Configuration options for [`wheel_picker`].
#[derive(Clone, PartialEq, Setters)]
pub struct WheelPickerArgs {
    /// Modifier chain applied to the wheel subtree.
    pub modifier: Modifier,
    /// Rows shown by the wheel, in order.
    pub options: Vec<WheelOption>,
    /// Currently selected value.
    ///
    /// The first row matching it is centered on mount; with no match the
    /// first row is centered. While the wheel is idle, an external change
    /// re-centers the matching row.
    pub selected: i32,
    /// Height of one row.
    pub row_height: Dp,
    /// Width of one row.
    pub row_width: Dp,
    /// Color of the centered row. Defaults to the theme primary color.
    #[setters(strip_option)]
    pub focus_color: Option<Color>,
    /// Color of every other row. Defaults to the theme on-surface-variant
    /// color.
    #[setters(strip_option)]
    pub unfocused_color: Option<Color>,
    /// Smoothing factor for the corrective snap animation.
    pub scroll_smoothing: f32,
    /// Called with the centered row's value when scrolling settles, and
    /// with the tapped row's value on a tap.
    #[setters(skip)]
    pub on_change: CallbackWith<i32>,
    /// Optional external controller for scroll position and phase.
    ///
    /// When this is `None`, `wheel_picker` creates and owns an internal
    /// controller.
    #[setters(skip)]
    pub controller: Option<State<WheelPickerController>>,
}

impl Default for WheelPickerArgs {
    fn default() -> Self {
        Self {
            modifier: Modifier::new(),
            options: Vec::new(),
            selected: 0,
            row_height: DEFAULT_ROW_HEIGHT,
            row_width: DEFAULT_ROW_WIDTH,
            focus_color: None,
            unfocused_color: None,
            scroll_smoothing: DEFAULT_SCROLL_SMOOTHING,
            on_change: CallbackWith::new(|_| {}),
            controller: None,
        }
    }
}

impl WheelPickerArgs {
    /// Sets the on_change handler.
    pub fn on_change<F>(mut self, on_change: F) -> Self
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.on_change = CallbackWith::new(on_change);
        self
    }

    /// Sets the on_change handler using a shared callback.
    pub fn on_change_shared(mut self, on_change: impl Into<CallbackWith<i32>>) -> Self {
        self.on_change = on_change.into();
        self
    }

    /// Sets an external wheel controller.
    pub fn controller(mut self, controller: State<WheelPickerController>) -> Self {
        self.controller = Some(controller);
        self
    }
}

impl From<&WheelPickerArgs> for WheelPickerArgs {
    fn from(value: &WheelPickerArgs) -> Self {
        value.clone()
    }
}

#[derive(Clone)]
struct WheelPickerLayout {
    row_height: Px,
    row_width: Px,
    option_count: usize,
    visible_rows: Vec<usize>,
    scroll_offset: Px,
    controller: State<WheelPickerController>,
}

impl PartialEq for WheelPickerLayout {
    fn eq(&self, other: &Self) -> bool {
        self.row_height == other.row_height
            && self.row_width == other.row_width
            && self.option_count == other.option_count
            && self.visible_rows == other.visible_rows
            && self.scroll_offset == other.scroll_offset
    }
}

impl LayoutSpec for WheelPickerLayout {
    fn measure(
        &self,
        input: &LayoutInput<'_>,
        output: &mut LayoutOutput<'_>,
    ) -> Result<ComputedData, MeasurementError> {
        if self.option_count == 0 {
            return Ok(ComputedData::min_from_constraint(
                input.parent_constraint().as_ref(),
            ));
        }

        if input.children_ids().len() != self.visible_rows.len() {
            return Err(MeasurementError::MeasureFnFailed(
                "Wheel picker measured child count mismatch".into(),
            ));
        }

        let child_constraint = Constraint::new(
            DimensionValue::Fixed(self.row_width),
            DimensionValue::Fixed(self.row_height),
        );
        let children_to_measure: Vec<_> = input
            .children_ids()
            .iter()
            .map(|&child_id| (child_id, child_constraint))
            .collect();
        input.measure_children(children_to_measure)?;

        self.controller
            .with_mut(|c| c.update_layout(self.row_height, self.option_count));
        let scroll_offset = self.controller.with(|c| c.scroll_offset_px());

        let padding = px_mul(self.row_height, PADDING_ROWS);
        for (&child_id, &row_index) in input.children_ids().iter().zip(self.visible_rows.iter()) {
            let y = padding + px_mul(self.row_height, row_index) + scroll_offset;
            output.place_child(child_id, PxPosition::new(Px::ZERO, y));
        }

        Ok(ComputedData {
            width: self.row_width,
            height: px_mul(self.row_height, VISIBLE_ROWS),
        })
    }

    fn record(&self, input: &RenderInput<'_>) {
        input.metadata_mut().clips_children = true;
    }
}

fn compute_visible_rows(centered: usize, option_count: usize, beyond: usize) -> Vec<usize> {
    if option_count == 0 {
        return Vec::new();
    }
    let extra = beyond.saturating_add(1);
    let start = centered.saturating_sub(extra);
    let end = (centered + extra + 1).min(option_count);
    (start..end).collect()
}

fn index_of_value(options: &[WheelOption], value: i32) -> usize {
    options
        .iter()
        .position(|option| option.value == value)
        .unwrap_or(0)
}

fn px_mul(px: Px, times: usize) -> Px {
    if times == 0 {
        return Px::ZERO;
    }
    let value = px.0 as i64 * times as i64;
    if value > i64::from(i32::MAX) {
        Px(i32::MAX)
    } else if value < i64::from(i32::MIN) {
        Px(i32::MIN)
    } else {
        Px(value as i32)
    }
}

/// # wheel_picker
///
/// Renders a scrollable wheel of labeled values that snaps to the centered
/// row.
///
/// ## Usage
///
/// Use as one column of a multi-column picker, binding `selected` to a
/// field of your state and updating it from `on_change`.
///
/// ## Parameters
///
/// - `args` — options, geometry, colors, and the change callback; see
///   [`WheelPickerArgs`].
///
/// ## Examples
///
/// ```
/// use tessera_datetime_picker::wheel_picker::{WheelOption, WheelPickerArgs};
///
/// let options: Vec<WheelOption> = (1..=12)
///     .map(|month| WheelOption::new(month, format!("{month:02}")))
///     .collect();
/// let args = WheelPickerArgs::default()
///     .options(options)
///     .selected(4)
///     .on_change(|value| {
///         assert!((1..=12).contains(&value));
///     });
/// assert_eq!(args.selected, 4);
/// ```
#[tessera]
pub fn wheel_picker(args: &WheelPickerArgs) {
    let mut args: WheelPickerArgs = args.clone();
    let initial_index = index_of_value(&args.options, args.selected);
    let controller = args
        .controller
        .unwrap_or_else(|| remember(move || WheelPickerController::new(initial_index)));
    args.controller = Some(controller);

    let modifier = args.modifier.clone();
    modifier.run(move || wheel_picker_node(&args, controller));
}

#[tessera]
fn wheel_picker_node(args: &WheelPickerArgs, controller: State<WheelPickerController>) {
    let args = args.clone();
    let scheme = use_context::<MaterialTheme>()
        .expect("MaterialTheme must be provided")
        .get()
        .color_scheme;
    let focus_color = args.focus_color.unwrap_or(scheme.primary);
    let unfocused_color = args.unfocused_color.unwrap_or(scheme.on_surface_variant);

    let option_count = args.options.len();
    controller.with_mut(|c| {
        c.set_option_count(option_count);
        c.tick(Instant::now(), args.scroll_smoothing);
    });

    if let Some(index) = controller.with_mut(|c| c.take_settled())
        && let Some(option) = args.options.get(index)
    {
        tracing::trace!(value = option.value, "wheel picker settled");
        args.on_change.call(option.value);
    }

    controller.with_mut(|c| c.sync_selected(index_of_value(&args.options, args.selected)));

    if controller.with(|c| c.has_pending_animation_frame()) {
        let smoothing = args.scroll_smoothing;
        receive_frame_nanos(move |_frame_nanos| {
            let has_pending_animation_frame = controller.with_mut(|c| {
                c.tick(Instant::now(), smoothing);
                c.has_pending_animation_frame()
            });
            if has_pending_animation_frame {
                FrameNanosControl::Continue
            } else {
                FrameNanosControl::Stop
            }
        });
    }

    let centered = controller.with(|c| c.centered_index());
    let visible_rows = compute_visible_rows(centered, option_count, PADDING_ROWS);
    let scroll_offset = controller.with(|c| c.scroll_offset_px());

    layout(WheelPickerLayout {
        row_height: Px::from(args.row_height),
        row_width: Px::from(args.row_width),
        option_count,
        visible_rows: visible_rows.clone(),
        scroll_offset,
        controller,
    });

    input_handler(move |input| {
        let is_cursor_in_component = input
            .cursor_position_rel
            .map(|pos| is_position_in_component(input.computed_data, pos))
            .unwrap_or(false);
        let pointer_down = controller.with(|c| c.is_pointer_down());
        if !is_cursor_in_component && !pointer_down {
            return;
        }

        let now = Instant::now();
        let mut saw_scroll = false;
        for event in input.cursor_events.iter() {
            match &event.content {
                CursorEventContent::Scroll(scroll_event) => {
                    let delta = scroll_event.delta_y;
                    if delta.abs() >= 0.01 {
                        let is_touch = scroll_event.source == ScrollEventSource::Touch;
                        controller.with_mut(|c| c.handle_scroll(delta, is_touch, event.timestamp));
                        saw_scroll = true;
                    }
                }
                CursorEventContent::Pressed(PressKeyEventType::Left) => {
                    if is_cursor_in_component {
                        controller
                            .with_mut(|c| c.press(input.cursor_position_rel, event.timestamp));
                    }
                }
                CursorEventContent::Released(PressKeyEventType::Left) => {
                    controller.with_mut(|c| c.release(event.timestamp));
                }
                _ => {}
            }
        }

        // Pointer-position drags only count on frames without scroll
        // events, so touch deltas are never applied twice.
        if !saw_scroll {
            controller.with_mut(|c| {
                if c.is_pointer_down()
                    && let Some(pos) = input.cursor_position_rel
                    && let Some(delta) = c.pointer_drag_delta(pos)
                    && delta.abs() >= 0.01
                {
                    c.apply_drag_delta(delta, now);
                }
            });
        }

        input
            .cursor_events
            .retain(|event| !matches!(event.content, CursorEventContent::Scroll(_)));
    });

    let row_height = args.row_height;
    let row_width = args.row_width;
    for row_index in visible_rows {
        let Some(option) = args.options.get(row_index).cloned() else {
            continue;
        };
        let color = if row_index == centered {
            focus_color
        } else {
            unfocused_color
        };
        let on_change = args.on_change.clone();
        key(row_index, move || {
            option_row(
                option.clone(),
                color,
                row_width,
                row_height,
                controller,
                on_change.clone(),
            );
        });
    }
}

fn option_row(
    option: WheelOption,
    color: Color,
    row_width: Dp,
    row_height: Dp,
    controller: State<WheelPickerController>,
    on_change: CallbackWith<i32>,
) {
    let value = option.value;
    let label = option.label;
    surface(&SurfaceArgs::with_child(
        SurfaceArgs::default()
            .modifier(Modifier::new().size(row_width, row_height))
            .style(SurfaceStyle::Filled {
                color: Color::TRANSPARENT,
            })
            .content_alignment(Alignment::Center)
            .on_click(move || {
                // Taps are honored only while the wheel is at rest.
                if controller.with(|c| c.accepts_tap()) {
                    on_change.call(value);
                }
            }),
        move || {
            text(&TextArgs::default().text(label.clone()).color(color));
        },
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: Px = Px(50);

    fn ready_controller(initial_index: usize, option_count: usize) -> WheelPickerController {
        let mut controller = WheelPickerController::new(initial_index);
        controller.update_layout(ROW, option_count);
        controller
    }

    fn settle_by_ticks(controller: &mut WheelPickerController, from: Instant) -> Vec<usize> {
        let mut settled = Vec::new();
        for i in 1..400u64 {
            controller.tick(from + Duration::from_millis(i * 16), DEFAULT_SCROLL_SMOOTHING);
            if let Some(index) = controller.take_settled() {
                settled.push(index);
            }
        }
        settled
    }

    #[test]
    fn initial_value_centers_matching_row() {
        let controller = ready_controller(3, 10);
        assert_eq!(controller.centered_index(), 3);
        assert_eq!(controller.scroll_offset, -150.0);
        assert_eq!(controller.target_offset, -150.0);
    }

    #[test]
    fn missing_initial_value_falls_back_to_first_row() {
        let options = vec![
            WheelOption::new(10, "10"),
            WheelOption::new(11, "11"),
            WheelOption::new(12, "12"),
        ];
        assert_eq!(index_of_value(&options, 11), 1);
        assert_eq!(index_of_value(&options, 99), 0);
    }

    #[test]
    fn wheel_scroll_settles_exactly_once_on_centered_row() {
        let mut controller = ready_controller(0, 10);
        let t0 = Instant::now();
        controller.handle_scroll(-80.0, false, t0);
        assert_eq!(controller.phase(), WheelPhase::Idle);

        // Still inside the idle window: no settle yet.
        controller.tick(t0 + Duration::from_millis(10), DEFAULT_SCROLL_SMOOTHING);
        assert_eq!(controller.take_settled(), None);

        controller.tick(t0 + Duration::from_millis(200), DEFAULT_SCROLL_SMOOTHING);
        // -80 px is closest to row 2 (1.6 rounds up).
        assert_eq!(controller.take_settled(), Some(2));
        assert_eq!(controller.take_settled(), None);
        assert_eq!(controller.selected_index(), 2);
        assert_eq!(controller.target_offset, -100.0);
    }

    #[test]
    fn slow_drag_settles_on_release() {
        let mut controller = ready_controller(0, 10);
        let t0 = Instant::now();
        controller.press(Some(PxPosition::new(Px(10), Px(100))), t0);
        controller.handle_scroll(-20.0, true, t0 + Duration::from_millis(50));
        controller.handle_scroll(-20.0, true, t0 + Duration::from_millis(150));
        assert_eq!(controller.phase(), WheelPhase::Dragging);
        assert_eq!(controller.take_settled(), None);

        controller.release(t0 + Duration::from_millis(400));
        assert_eq!(controller.phase(), WheelPhase::Idle);
        assert_eq!(controller.take_settled(), Some(1));
        assert_eq!(controller.take_settled(), None);
        assert_eq!(controller.target_offset, -50.0);
    }

    #[test]
    fn fling_coasts_then_settles_exactly_once() {
        let mut controller = ready_controller(0, 60);
        let t0 = Instant::now();
        controller.press(Some(PxPosition::new(Px(10), Px(100))), t0);
        for i in 1..=5u64 {
            controller.handle_scroll(-30.0, true, t0 + Duration::from_millis(i * 10));
        }
        let release = t0 + Duration::from_millis(55);
        controller.release(release);
        assert_eq!(controller.phase(), WheelPhase::Settling);
        assert_eq!(controller.take_settled(), None);

        let settled = settle_by_ticks(&mut controller, release);
        assert_eq!(settled.len(), 1);
        assert_eq!(controller.phase(), WheelPhase::Idle);
        assert_eq!(settled[0], controller.selected_index());
        assert_eq!(
            controller.target_offset,
            -(ROW.to_f32()) * settled[0] as f32
        );
        // The fling traveled past the row it started on.
        assert!(settled[0] > 1);
    }

    #[test]
    fn fling_is_clamped_at_the_last_row() {
        let mut controller = ready_controller(0, 4);
        let t0 = Instant::now();
        controller.press(Some(PxPosition::new(Px(10), Px(100))), t0);
        for i in 1..=5u64 {
            controller.handle_scroll(-60.0, true, t0 + Duration::from_millis(i * 10));
        }
        let release = t0 + Duration::from_millis(55);
        controller.release(release);

        let settled = settle_by_ticks(&mut controller, release);
        assert_eq!(settled, vec![3]);
        assert_eq!(controller.scroll_offset, -150.0);
    }

    #[test]
    fn taps_are_honored_only_while_idle() {
        let mut controller = ready_controller(0, 10);
        assert!(controller.accepts_tap());

        let t0 = Instant::now();
        controller.handle_scroll(-20.0, true, t0);
        assert!(!controller.accepts_tap());

        controller.release(t0 + Duration::from_millis(10));
        controller.take_settled();
        assert!(controller.accepts_tap());
    }

    #[test]
    fn plain_click_does_not_start_a_settle() {
        let mut controller = ready_controller(0, 10);
        let t0 = Instant::now();
        controller.press(Some(PxPosition::new(Px(10), Px(100))), t0);
        assert!(controller.accepts_tap());

        controller.release(t0 + Duration::from_millis(80));
        assert_eq!(controller.take_settled(), None);
        assert!(controller.accepts_tap());
    }

    #[test]
    fn pressing_a_coasting_wheel_catches_it_and_still_settles_once() {
        let mut controller = ready_controller(0, 60);
        let t0 = Instant::now();
        controller.press(Some(PxPosition::new(Px(10), Px(100))), t0);
        for i in 1..=5u64 {
            controller.handle_scroll(-30.0, true, t0 + Duration::from_millis(i * 10));
        }
        let release = t0 + Duration::from_millis(55);
        controller.release(release);
        assert_eq!(controller.phase(), WheelPhase::Settling);

        controller.tick(release + Duration::from_millis(16), DEFAULT_SCROLL_SMOOTHING);
        let caught = release + Duration::from_millis(32);
        controller.press(Some(PxPosition::new(Px(10), Px(100))), caught);
        assert_eq!(controller.phase(), WheelPhase::Idle);
        controller.release(caught + Duration::from_millis(10));

        let settled = settle_by_ticks(&mut controller, caught);
        assert_eq!(settled.len(), 1);
        assert!(controller.accepts_tap());
    }

    #[test]
    fn external_sync_recenters_only_while_idle() {
        let mut controller = ready_controller(0, 31);
        controller.sync_selected(30);
        assert_eq!(controller.centered_index(), 30);
        assert_eq!(controller.scroll_offset, -1500.0);

        let t0 = Instant::now();
        controller.handle_scroll(-20.0, true, t0);
        controller.sync_selected(5);
        assert_ne!(controller.centered_index(), 5);
    }

    #[test]
    fn external_sync_with_same_row_keeps_snap_animation() {
        let mut controller = ready_controller(0, 10);
        let t0 = Instant::now();
        controller.handle_scroll(-80.0, false, t0);
        controller.tick(t0 + Duration::from_millis(200), DEFAULT_SCROLL_SMOOTHING);
        assert_eq!(controller.take_settled(), Some(2));

        // The host writes the settled value back; the snap target must
        // survive while the offset is still animating.
        let offset_before = controller.scroll_offset;
        controller.sync_selected(2);
        assert_eq!(controller.scroll_offset, offset_before);
        assert_eq!(controller.target_offset, -100.0);
    }

    #[test]
    fn shrinking_option_list_clamps_the_window() {
        let mut controller = ready_controller(30, 31);
        assert_eq!(controller.centered_index(), 30);

        controller.update_layout(ROW, 28);
        assert_eq!(controller.centered_index(), 27);
        assert_eq!(controller.scroll_offset, -1350.0);
    }

    #[test]
    fn visible_rows_cover_the_window_and_stay_in_bounds() {
        assert_eq!(compute_visible_rows(0, 10, PADDING_ROWS), vec![0, 1, 2, 3]);
        assert_eq!(
            compute_visible_rows(5, 10, PADDING_ROWS),
            vec![2, 3, 4, 5, 6, 7, 8]
        );
        assert_eq!(compute_visible_rows(9, 10, PADDING_ROWS), vec![6, 7, 8, 9]);
        assert!(compute_visible_rows(0, 0, PADDING_ROWS).is_empty());
    }

    #[test]
    fn programmatic_jump_and_scroll_do_not_fire_settle() {
        let mut controller = ready_controller(0, 10);
        controller.jump_to_index(4);
        assert_eq!(controller.centered_index(), 4);
        assert_eq!(controller.take_settled(), None);

        controller.scroll_to_index(7);
        assert_eq!(controller.target_offset, -350.0);
        assert_eq!(controller.take_settled(), None);
    }
}
