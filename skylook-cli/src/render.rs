use std::fmt::Write;

use skylook_core::{
    DayLabel, IconId, ViewModel,
    view::{HourlyView, round_half_up},
};

/// Plain-text rendering of a view model.
pub fn view(vm: &ViewModel, selected_day: Option<&DayLabel>) -> String {
    let temp = vm.units.temperature.symbol();
    let mut out = String::new();

    let current = &vm.current;
    let _ = writeln!(out, "{}", current.location);
    let _ = writeln!(out, "{}", current.date);
    let _ = writeln!(out, "{}  {}{temp}", icon(current.icon), current.temperature);
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<15}{}{temp}", "Feels like", current.feels_like);
    let _ = writeln!(out, "{:<15}{}%", "Humidity", current.humidity);
    let _ = writeln!(
        out,
        "{:<15}{} {}",
        "Wind",
        current.wind_speed,
        vm.units.wind_speed.symbol()
    );
    let _ = writeln!(
        out,
        "{:<15}{} {}",
        "Precipitation",
        current.precipitation,
        vm.units.precipitation.symbol()
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Daily forecast");
    for day in &vm.daily {
        let _ = writeln!(
            out,
            "  {:<4} {:<14} {:>4}° / {}°",
            day.weekday,
            icon(day.icon),
            round_half_up(day.temp_max),
            round_half_up(day.temp_min),
        );
    }

    let _ = writeln!(out);
    match selected_day {
        Some(day) => {
            let _ = writeln!(out, "Hourly forecast ({day})");
        }
        None => {
            let _ = writeln!(out, "Hourly forecast");
        }
    }
    if vm.hourly.is_empty() {
        let _ = writeln!(out, "  -");
    }
    for hour in &vm.hourly {
        let _ = writeln!(out, "  {}", hourly_line(hour));
    }

    out
}

fn hourly_line(hour: &HourlyView) -> String {
    format!(
        "{:<6} {:<14} {}°",
        hour.time,
        icon(hour.icon),
        round_half_up(hour.temperature)
    )
}

/// Unknown codes render blank rather than as a placeholder name.
fn icon(id: IconId) -> &'static str {
    if id.is_known() { id.as_str() } else { "" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skylook_core::{
        Units,
        view::{CurrentView, DailyView},
    };

    fn sample() -> ViewModel {
        ViewModel {
            current: CurrentView {
                location: "Berlin, Germany".into(),
                date: "Sunday, Oct 19".into(),
                temperature: 12,
                feels_like: 10,
                humidity: 68.0,
                wind_speed: 15,
                precipitation: 0,
                icon: IconId::Overcast,
            },
            daily: vec![DailyView {
                weekday: "Sun".into(),
                day: DayLabel::from("Sunday"),
                icon: IconId::Rain,
                temp_max: 14.4,
                temp_min: 6.5,
            }],
            hourly: vec![HourlyView {
                time: "3 PM".into(),
                temperature: 11.6,
                icon: IconId::Unknown,
            }],
            units: Units::default(),
        }
    }

    #[test]
    fn renders_all_blocks() {
        let day = DayLabel::from("Sunday");
        let text = view(&sample(), Some(&day));

        assert!(text.starts_with("Berlin, Germany\nSunday, Oct 19\n"));
        assert!(text.contains("overcast  12°C"));
        assert!(text.contains("Humidity       68%"));
        assert!(text.contains("Wind           15 km/h"));
        assert!(text.contains("14° / 7°"));
        assert!(text.contains("Hourly forecast (Sunday)"));
    }

    #[test]
    fn unknown_icon_renders_blank() {
        let line = hourly_line(&sample().hourly[0]);
        assert_eq!(line, "3 PM                  12°");
    }
}
