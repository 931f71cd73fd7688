//! A six-column wheel picker for selecting a calendar date and clock time.
//!
//! ## Usage
//!
//! Use to let users compose a full timestamp (year through second) by
//! spinning one wheel per field.
use std::{
    ops::RangeInclusive,
    time::{SystemTime, UNIX_EPOCH},
};

use derive_setters::Setters;
use tessera_ui::{Color, DimensionValue, Dp, Modifier, State, remember, tessera, use_context};

use tessera_components::{
    alignment::{Alignment, CrossAxisAlignment, MainAxisAlignment},
    boxed::{BoxedArgs, boxed},
    column::{ColumnArgs, column},
    divider::{DividerArgs, horizontal_divider},
    modifier::ModifierExt as _,
    row::{RowArgs, row},
    spacer::{SpacerArgs, spacer},
    surface::{SurfaceArgs, SurfaceStyle, surface},
    theme::MaterialTheme,
};

use crate::wheel_picker::{WheelOption, WheelPickerArgs, wheel_picker};

const DEFAULT_ROW_HEIGHT: Dp = Dp(50.0);
const DEFAULT_COLUMN_WIDTH: Dp = Dp(50.0);
const DEFAULT_YEAR_COLUMN_WIDTH: Dp = Dp(70.0);
const DIVIDER_MARGIN: Dp = Dp(15.0);

/// One of the six date/time fields driven by a picker column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeField {
    /// Calendar year.
    Year,
    /// Month of the year (1-12).
    Month,
    /// Day of the month (1-31).
    Day,
    /// Hour of the day (0-23).
    Hour,
    /// Minute of the hour (0-59).
    Minute,
    /// Second of the minute (0-59).
    Second,
}

/// Defaults for date/time picker behavior.
pub struct DateTimePickerDefaults;

impl DateTimePickerDefaults {
    /// Number of years offered on either side of the current year.
    pub const YEAR_SPAN: i32 = 50;

    /// Returns the default selectable year range, centered on the current
    /// year.
    pub fn year_range() -> RangeInclusive<i32> {
        let (year, ..) = now_utc();
        year - Self::YEAR_SPAN..=year + Self::YEAR_SPAN
    }
}

/// Holds the current selection for a date/time picker.
///
/// All mutation clamps silently: out-of-range values are pulled into the
/// field's domain, and changing the year or month re-clamps the day to the
/// month's length.
pub struct DateTimePickerState {
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    year_range: RangeInclusive<i32>,
}

impl DateTimePickerState {
    /// Creates a state with the provided initial values, clamped into their
    /// domains.
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        year_range: RangeInclusive<i32>,
    ) -> Self {
        let year_range = normalize_year_range(year_range);
        let year = clamp_year(year, &year_range);
        let month = month.clamp(1, 12);
        let day = day.clamp(1, days_in_month(year, month));
        Self {
            year,
            month,
            day,
            hour: hour.min(23),
            minute: minute.min(59),
            second: second.min(59),
            year_range,
        }
    }

    /// Creates a state holding the current UTC date and time.
    pub fn now(year_range: RangeInclusive<i32>) -> Self {
        let (year, month, day, hour, minute, second) = now_utc();
        Self::new(year, month, day, hour, minute, second, year_range)
    }

    /// Returns the selected year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the selected month (1-12).
    pub fn month(&self) -> u8 {
        self.month
    }

    /// Returns the selected day of the month.
    pub fn day(&self) -> u8 {
        self.day
    }

    /// Returns the selected hour (0-23).
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the selected minute (0-59).
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Returns the selected second (0-59).
    pub fn second(&self) -> u8 {
        self.second
    }

    /// Returns the selectable year range.
    pub fn year_range(&self) -> &RangeInclusive<i32> {
        &self.year_range
    }

    /// Returns the number of days in the selected month.
    pub fn day_count(&self) -> u8 {
        days_in_month(self.year, self.month)
    }

    /// Sets the year, clamped to the year range, re-clamping the day.
    pub fn set_year(&mut self, year: i32) {
        self.year = clamp_year(year, &self.year_range);
        self.clamp_day();
    }

    /// Sets the month, clamped to 1-12, re-clamping the day.
    pub fn set_month(&mut self, month: u8) {
        self.month = month.clamp(1, 12);
        self.clamp_day();
    }

    /// Sets the day, clamped to the length of the selected month.
    pub fn set_day(&mut self, day: u8) {
        self.day = day.clamp(1, self.day_count());
    }

    /// Sets the hour, clamped to 0-23.
    pub fn set_hour(&mut self, hour: u8) {
        self.hour = hour.min(23);
    }

    /// Sets the minute, clamped to 0-59.
    pub fn set_minute(&mut self, minute: u8) {
        self.minute = minute.min(59);
    }

    /// Sets the second, clamped to 0-59.
    pub fn set_second(&mut self, second: u8) {
        self.second = second.min(59);
    }

    /// Routes a column value to the matching field setter.
    pub fn set_field(&mut self, field: DateTimeField, value: i32) {
        match field {
            DateTimeField::Year => self.set_year(value),
            DateTimeField::Month => self.set_month(saturate_u8(value)),
            DateTimeField::Day => self.set_day(saturate_u8(value)),
            DateTimeField::Hour => self.set_hour(saturate_u8(value)),
            DateTimeField::Minute => self.set_minute(saturate_u8(value)),
            DateTimeField::Second => self.set_second(saturate_u8(value)),
        }
    }

    /// Returns the selection as `YYYY-M-D H:Min:Sec` without zero padding.
    pub fn formatted(&self) -> String {
        format!(
            "{}-{}-{} {}:{}:{}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }

    fn clamp_day(&mut self) {
        let max_day = self.day_count();
        if self.day > max_day {
            self.day = max_day;
        }
        if self.day == 0 {
            self.day = 1;
        }
    }

    fn snapshot(&self) -> DateTimeSnapshot {
        DateTimeSnapshot {
            year: self.year,
            month: self.month,
            day: self.day,
            hour: self.hour,
            minute: self.minute,
            second: self.second,
        }
    }
}

impl Default for DateTimePickerState {
    fn default() -> Self {
        Self::now(DateTimePickerDefaults::year_range())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
struct DateTimeSnapshot {
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

/// Configuration options for [`date_time_picker`].
///
/// Initial-state fields are applied only when `date_time_picker` owns the
/// state.
#[derive(Clone, PartialEq, Setters)]
pub struct DateTimePickerArgs {
    /// Optional modifier chain applied to the picker.
    pub modifier: Modifier,
    /// Height of one wheel row.
    pub row_height: Dp,
    /// Width of the month through second columns.
    pub column_width: Dp,
    /// Width of the year column.
    pub year_column_width: Dp,
    /// Color of the centered rows. Defaults to the theme primary color.
    #[setters(strip_option)]
    pub focus_color: Option<Color>,
    /// Color of the other rows. Defaults to the theme on-surface-variant
    /// color.
    #[setters(strip_option)]
    pub unfocused_color: Option<Color>,
    /// Year range offered by the year column.
    pub year_range: RangeInclusive<i32>,
    /// Optional external state for the selection.
    ///
    /// When this is `None`, `date_time_picker` creates and owns an internal
    /// state initialized to the current date and time.
    #[setters(skip)]
    pub state: Option<State<DateTimePickerState>>,
}

impl Default for DateTimePickerArgs {
    fn default() -> Self {
        Self {
            modifier: Modifier::new()
                .constrain(Some(DimensionValue::WRAP), Some(DimensionValue::WRAP)),
            row_height: DEFAULT_ROW_HEIGHT,
            column_width: DEFAULT_COLUMN_WIDTH,
            year_column_width: DEFAULT_YEAR_COLUMN_WIDTH,
            focus_color: None,
            unfocused_color: None,
            year_range: DateTimePickerDefaults::year_range(),
            state: None,
        }
    }
}

impl DateTimePickerArgs {
    /// Sets an external date/time picker state.
    pub fn state(mut self, state: State<DateTimePickerState>) -> Self {
        self.state = Some(state);
        self
    }
}

impl From<&DateTimePickerArgs> for DateTimePickerArgs {
    fn from(value: &DateTimePickerArgs) -> Self {
        value.clone()
    }
}

#[derive(Clone, Copy, PartialEq)]
struct WheelStyle {
    row_height: Dp,
    focus_color: Option<Color>,
    unfocused_color: Option<Color>,
}

/// # date_time_picker
///
/// Renders six wheel columns (year, month, day, hour, minute, second) with
/// a divider overlay marking the centered row window.
///
/// ## Usage
///
/// Use when users need to pick a full timestamp. Pass an external state to
/// observe the selection; the day column always offers exactly the days of
/// the selected month.
///
/// ## Parameters
///
/// - `args` — configuration for geometry, colors, and state; see
///   [`DateTimePickerArgs`].
///
/// ## Examples
///
/// ```
/// use tessera_datetime_picker::date_time_picker::DateTimePickerState;
///
/// let mut state = DateTimePickerState::new(2024, 1, 31, 12, 0, 0, 1900..=2100);
/// state.set_month(4);
/// assert_eq!(state.day(), 30);
/// assert_eq!(state.formatted(), "2024-4-30 12:0:0");
/// ```
#[tessera]
pub fn date_time_picker(args: &DateTimePickerArgs) {
    let mut args: DateTimePickerArgs = args.clone();
    let year_range = args.year_range.clone();
    let state = args
        .state
        .unwrap_or_else(|| remember(move || DateTimePickerState::now(year_range)));
    args.state = Some(state);
    date_time_picker_node(&args);
}

#[tessera]
fn date_time_picker_node(args: &DateTimePickerArgs) {
    let args = args.clone();
    let state = args
        .state
        .expect("date_time_picker_node requires state to be set");
    let snapshot = state.with(|s| s.snapshot());
    let scheme = use_context::<MaterialTheme>()
        .expect("MaterialTheme must be provided")
        .get()
        .color_scheme;

    let style = WheelStyle {
        row_height: args.row_height,
        focus_color: args.focus_color,
        unfocused_color: args.unfocused_color,
    };
    let row_height = args.row_height;
    let column_width = args.column_width;
    let year_column_width = args.year_column_width;
    let year_range = args.year_range.clone();

    boxed(
        BoxedArgs::default()
            .modifier(args.modifier)
            .alignment(Alignment::Center),
        move |scope| {
            let year_range = year_range.clone();
            scope.child(move || {
                let year_range = year_range.clone();
                surface(&SurfaceArgs::with_child(
                    SurfaceArgs::default()
                        .modifier(Modifier::new().fill_max_width())
                        .style(SurfaceStyle::Filled {
                            color: scheme.surface,
                        }),
                    move || {
                        let year_range = year_range.clone();
                        row(
                            RowArgs::default()
                                .modifier(Modifier::new().fill_max_width())
                                .main_axis_alignment(MainAxisAlignment::SpaceEvenly)
                                .cross_axis_alignment(CrossAxisAlignment::Center),
                            move |row_scope| {
                                let year_range = year_range.clone();
                                row_scope.child(move || {
                                    field_wheel(
                                        year_options(&year_range),
                                        snapshot.year,
                                        year_column_width,
                                        style,
                                        state,
                                        DateTimeField::Year,
                                    );
                                });
                                row_scope.child(move || {
                                    field_wheel(
                                        month_options(),
                                        i32::from(snapshot.month),
                                        column_width,
                                        style,
                                        state,
                                        DateTimeField::Month,
                                    );
                                });
                                row_scope.child(move || {
                                    field_wheel(
                                        day_options(snapshot.year, snapshot.month),
                                        i32::from(snapshot.day),
                                        column_width,
                                        style,
                                        state,
                                        DateTimeField::Day,
                                    );
                                });
                                row_scope.child(move || {
                                    field_wheel(
                                        hour_options(),
                                        i32::from(snapshot.hour),
                                        column_width,
                                        style,
                                        state,
                                        DateTimeField::Hour,
                                    );
                                });
                                row_scope.child(move || {
                                    field_wheel(
                                        sexagesimal_options(),
                                        i32::from(snapshot.minute),
                                        column_width,
                                        style,
                                        state,
                                        DateTimeField::Minute,
                                    );
                                });
                                row_scope.child(move || {
                                    field_wheel(
                                        sexagesimal_options(),
                                        i32::from(snapshot.second),
                                        column_width,
                                        style,
                                        state,
                                        DateTimeField::Second,
                                    );
                                });
                            },
                        );
                    },
                ));
            });

            // Drawn after the wheels so the window markers stay on top.
            scope.child(move || {
                center_window_dividers(row_height);
            });
        },
    );
}

fn field_wheel(
    options: Vec<WheelOption>,
    selected: i32,
    width: Dp,
    style: WheelStyle,
    state: State<DateTimePickerState>,
    field: DateTimeField,
) {
    let mut wheel_args = WheelPickerArgs::default()
        .options(options)
        .selected(selected)
        .row_height(style.row_height)
        .row_width(width)
        .on_change(move |value| {
            state.with_mut(|s| s.set_field(field, value));
        });
    if let Some(color) = style.focus_color {
        wheel_args = wheel_args.focus_color(color);
    }
    if let Some(color) = style.unfocused_color {
        wheel_args = wheel_args.unfocused_color(color);
    }
    wheel_picker(&wheel_args);
}

fn center_window_dividers(row_height: Dp) {
    column(
        ColumnArgs::default().modifier(
            Modifier::new()
                .fill_max_width()
                .padding_symmetric(DIVIDER_MARGIN, Dp(0.0)),
        ),
        move |scope| {
            scope.child(|| {
                horizontal_divider(DividerArgs::default());
            });
            scope.child(move || {
                spacer(&SpacerArgs::new(Modifier::new().height(row_height)));
            });
            scope.child(|| {
                horizontal_divider(DividerArgs::default());
            });
        },
    );
}

fn year_options(year_range: &RangeInclusive<i32>) -> Vec<WheelOption> {
    year_range
        .clone()
        .map(|year| WheelOption::new(year, format!("{year:04}")))
        .collect()
}

fn month_options() -> Vec<WheelOption> {
    (1..=12)
        .map(|month| WheelOption::new(month, format_two_digit(month as u8)))
        .collect()
}

fn day_options(year: i32, month: u8) -> Vec<WheelOption> {
    (1..=i32::from(days_in_month(year, month)))
        .map(|day| WheelOption::new(day, format_two_digit(day as u8)))
        .collect()
}

fn hour_options() -> Vec<WheelOption> {
    (0..24)
        .map(|hour| WheelOption::new(hour, format_two_digit(hour as u8)))
        .collect()
}

fn sexagesimal_options() -> Vec<WheelOption> {
    (0..60)
        .map(|value| WheelOption::new(value, format_two_digit(value as u8)))
        .collect()
}

fn format_two_digit(value: u8) -> String {
    format!("{value:02}")
}

fn saturate_u8(value: i32) -> u8 {
    value.clamp(0, i32::from(u8::MAX)) as u8
}

fn normalize_year_range(range: RangeInclusive<i32>) -> RangeInclusive<i32> {
    let start = *range.start();
    let end = *range.end();
    if start <= end { range } else { end..=start }
}

fn clamp_year(year: i32, year_range: &RangeInclusive<i32>) -> i32 {
    year.clamp(*year_range.start(), *year_range.end())
}

fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 30,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn now_utc() -> (i32, u8, u8, u8, u8, u8) {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let secs = duration.as_secs();
    let (year, month, day) = civil_from_days((secs / 86_400) as i64);
    let hour = ((secs / 3_600) % 24) as u8;
    let minute = ((secs / 60) % 60) as u8;
    let second = (secs % 60) as u8;
    (year, month, day, hour, minute, second)
}

fn civil_from_days(days: i64) -> (i32, u8, u8) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = mp + if mp < 10 { 3 } else { -9 };
    let year = y + if month <= 2 { 1 } else { 0 };
    (year as i32, month as u8, day as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_in_month_follows_the_gregorian_rule() {
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 1), 31);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 12), 31);
    }

    #[test]
    fn civil_from_days_converts_known_dates() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
        assert_eq!(civil_from_days(19_782), (2024, 2, 29));
    }

    #[test]
    fn month_change_clamps_the_day() {
        let mut state = DateTimePickerState::new(2023, 1, 31, 0, 0, 0, 1900..=2100);
        state.set_month(4);
        assert_eq!(state.day(), 30);
    }

    #[test]
    fn leaving_a_leap_year_clamps_february() {
        let mut state = DateTimePickerState::new(2024, 2, 29, 0, 0, 0, 1900..=2100);
        state.set_year(2023);
        assert_eq!(state.day(), 28);
    }

    #[test]
    fn out_of_range_values_are_silently_clamped() {
        let mut state = DateTimePickerState::new(2024, 6, 15, 12, 30, 30, 1900..=2100);
        state.set_field(DateTimeField::Hour, 99);
        assert_eq!(state.hour(), 23);
        state.set_field(DateTimeField::Month, 0);
        assert_eq!(state.month(), 1);
        state.set_field(DateTimeField::Minute, -3);
        assert_eq!(state.minute(), 0);
        state.set_field(DateTimeField::Day, 40);
        assert_eq!(state.day(), 31);
        state.set_field(DateTimeField::Year, 9999);
        assert_eq!(state.year(), 2100);
    }

    #[test]
    fn construction_clamps_every_field() {
        let state = DateTimePickerState::new(1800, 13, 40, 25, 61, 61, 1900..=2100);
        assert_eq!(state.year(), 1900);
        assert_eq!(state.month(), 12);
        assert_eq!(state.day(), 31);
        assert_eq!(state.hour(), 23);
        assert_eq!(state.minute(), 59);
        assert_eq!(state.second(), 59);
    }

    #[test]
    fn formatted_uses_no_zero_padding() {
        let state = DateTimePickerState::new(2024, 4, 5, 9, 0, 7, 1900..=2100);
        assert_eq!(state.formatted(), "2024-4-5 9:0:7");
    }

    #[test]
    fn column_labels_are_zero_padded() {
        let months = month_options();
        assert_eq!(months[0].label(), "01");
        assert_eq!(months[11].label(), "12");

        let hours = hour_options();
        assert_eq!(hours[0].label(), "00");
        assert_eq!(hours[23].label(), "23");

        let years = year_options(&(980..=1020));
        assert_eq!(years[0].label(), "0980");
        assert_eq!(years.last().map(WheelOption::label), Some("1020"));
    }

    #[test]
    fn day_options_match_the_selected_month() {
        assert_eq!(day_options(2024, 2).len(), 29);
        assert_eq!(day_options(2023, 2).len(), 28);
        assert_eq!(day_options(2023, 7).len(), 31);
        assert_eq!(day_options(2023, 7)[0].value(), 1);
    }

    #[test]
    fn default_state_is_now_and_internally_consistent() {
        let state = DateTimePickerState::default();
        assert!((1..=12).contains(&state.month()));
        assert!((1..=state.day_count()).contains(&state.day()));
        assert!(state.hour() <= 23);
        assert!(state.minute() <= 59);
        assert!(state.second() <= 59);
        assert!(state.year_range().contains(&state.year()));
        assert_eq!(
            state.formatted(),
            format!(
                "{}-{}-{} {}:{}:{}",
                state.year(),
                state.month(),
                state.day(),
                state.hour(),
                state.minute(),
                state.second()
            )
        );
    }

    #[test]
    fn reversed_year_range_is_normalized() {
        let state = DateTimePickerState::new(2024, 6, 15, 0, 0, 0, 2100..=1900);
        assert_eq!(state.year_range(), &(1900..=2100));
    }
}
