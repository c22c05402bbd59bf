use chrono::{Local, NaiveTime};
use polars::prelude::{AnyValue, DataFrame};
use routine_tool::{Planner, TransportTableConfig};
use serde_json;
use std::fs;
use std::io::{self, Write};

fn render_df_as_text_table(df: &DataFrame) -> String {
    // Compute column widths
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for (ci, col) in columns.iter().enumerate() {
        for row_idx in 0..df.height() {
            if let Ok(ref av) = col.get(row_idx) {
                let s = match av {
                    AnyValue::Null => String::new(),
                    AnyValue::Int32(v) => v.to_string(),
                    AnyValue::Int64(v) => v.to_string(),
                    AnyValue::String(s) => s.to_string(),
                    AnyValue::Boolean(v) => v.to_string(),
                    _ => av.to_string(),
                };
                if s.len() > widths[ci] {
                    widths[ci] = s.len();
                }
            }
        }
    }

    // Build horizontal separator
    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    // Build output
    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    // Header
    out.push('|');
    for (i, name) in col_names.iter().enumerate() {
        out.push(' ');
        out.push_str(name);
        let pad = widths[i] - name.len();
        if pad > 0 {
            out.push_str(&" ".repeat(pad));
        }
        out.push(' ');
        out.push('|');
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    // Rows
    for row_idx in 0..df.height() {
        out.push('|');
        for (ci, col) in columns.iter().enumerate() {
            let mut s = String::new();
            if let Ok(ref av) = col.get(row_idx) {
                s = match av {
                    AnyValue::Null => String::new(),
                    AnyValue::Int32(v) => v.to_string(),
                    AnyValue::Int64(v) => v.to_string(),
                    AnyValue::String(st) => st.to_string(),
                    AnyValue::Boolean(v) => v.to_string(),
                    _ => av.to_string(),
                };
            }
            out.push(' ');
            out.push_str(&s);
            let pad = widths[ci].saturating_sub(s.len());
            if pad > 0 {
                out.push_str(&" ".repeat(pad));
            }
            out.push(' ');
            out.push('|');
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show the checklist and time totals\n  add <minutes> <title...>           Add a preparation task\n  edit <id> <minutes> <title...>     Replace a task's title and duration\n  toggle <id>                        Flip a task's completed flag\n  delete <id>                        Remove a task\n  dest <text...>                     Set the destination\n  presets                            List destination presets\n  preset <n>                         Select destination preset n\n  arrive <HH:MM>                     Set the target arrival time\n  transport <key>                    Select a transport mode\n  transports show                    List transport modes\n  transports set <json_path>         Load transport table from JSON file\n  transports save <json_path>        Save current transport table to JSON file\n  transports default                 Reset to the built-in transport table\n  traffic <on|off>                   Toggle the traffic adjustment\n  dark <on|off>                      Toggle the dark theme preference\n  settings                           Show current selection and preferences\n  calc                               Compute departure and wake-up times\n  history                            List recent calculations\n  use <id>                           Reapply a history entry's selection\n  quit|exit                          Exit"
    );
}

fn print_transports(planner: &Planner) {
    println!("Transport modes:");
    for option in planner.transports().options() {
        println!(
            "  {:<8} {:<16} ~{} min",
            option.key, option.label, option.base_travel_minutes
        );
    }
}

fn print_presets() {
    println!("Destination presets:");
    for (idx, preset) in Planner::DESTINATION_PRESETS.iter().enumerate() {
        println!("  {}  {}", idx + 1, preset);
    }
}

fn print_settings(planner: &Planner) {
    let prefs = planner.preferences();
    println!("Destination      : {}", planner.destination().unwrap_or("-"));
    println!(
        "Arrival time     : {}",
        planner
            .arrival_time()
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!(
        "Transport        : {}",
        planner.transport_key().unwrap_or("-")
    );
    println!("Consider traffic : {}", prefs.consider_traffic);
    println!("Dark mode        : {}", prefs.dark_mode);
    println!("Transport custom : {}", planner.transports_is_custom());
}

fn print_history(planner: &Planner) {
    if planner.history().is_empty() {
        println!("History is empty.");
        return;
    }
    for entry in planner.history() {
        println!(
            "  [{}] {} {}: arrive {} via {}, leave {}, wake {}",
            entry.id,
            entry.date,
            entry.destination,
            entry.arrival_time.format("%H:%M"),
            entry.transport_label,
            entry.departure_time.format("%H:%M"),
            entry.wake_up_time.format("%H:%M")
        );
    }
}

fn print_totals(planner: &Planner) {
    match planner.total_preparation_minutes() {
        Ok(total) => println!("Preparation total: {} minutes", total),
        Err(e) => println!("Error computing preparation total: {}", e),
    }
    if let Some(key) = planner.transport_key() {
        let consider_traffic = planner.preferences().consider_traffic;
        if let Some(minutes) = planner.transports().travel_minutes(key, consider_traffic) {
            println!("Travel time      : {} minutes", minutes);
        }
    }
}

fn parse_on_off(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" => Some(true),
        "off" => Some(false),
        _ => None,
    }
}

fn main() {
    let mut planner = Planner::with_default_checklist().unwrap_or_else(|_| Planner::new());

    println!("Routine Tool (CLI) - type 'help' for commands\n");
    println!("{}", render_df_as_text_table(planner.dataframe()));

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        if stdin.read_line(&mut line).is_err() {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => {
                print_help();
            }
            "quit" | "exit" => break,
            "show" => {
                println!("{}", render_df_as_text_table(planner.dataframe()));
                print_totals(&planner);
            }
            "add" => {
                let minutes_s = parts.next();
                let title_parts: Vec<&str> = parts.collect();
                match (minutes_s, !title_parts.is_empty()) {
                    (Some(minutes_s), true) => {
                        let minutes: i64 = match minutes_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid minutes");
                                continue;
                            }
                        };
                        let title = title_parts.join(" ");
                        match planner.add_task(&title, minutes) {
                            Ok(id) => {
                                println!("Added task {id}.");
                                println!("{}", render_df_as_text_table(planner.dataframe()));
                            }
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: add <minutes> <title...>"),
                }
            }
            "edit" => {
                let id_s = parts.next();
                let minutes_s = parts.next();
                let title_parts: Vec<&str> = parts.collect();
                match (id_s, minutes_s, !title_parts.is_empty()) {
                    (Some(id_s), Some(minutes_s), true) => {
                        let id: i32 = match id_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid id");
                                continue;
                            }
                        };
                        let minutes: i64 = match minutes_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid minutes");
                                continue;
                            }
                        };
                        let title = title_parts.join(" ");
                        match planner.edit_task(id, &title, minutes) {
                            Ok(true) => {
                                println!("Task {id} updated.");
                                println!("{}", render_df_as_text_table(planner.dataframe()));
                            }
                            Ok(false) => println!("Task {id} not found."),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: edit <id> <minutes> <title...>"),
                }
            }
            "toggle" => match parts.next() {
                Some(id_s) => match id_s.parse::<i32>() {
                    Ok(id) => match planner.toggle_task(id) {
                        Ok(true) => {
                            println!("Task {id} toggled.");
                            println!("{}", render_df_as_text_table(planner.dataframe()));
                        }
                        Ok(false) => println!("Task {id} not found."),
                        Err(e) => println!("Error: {}", e),
                    },
                    Err(_) => println!("Invalid id"),
                },
                None => println!("Usage: toggle <id>"),
            },
            "delete" => match parts.next() {
                Some(id_s) => match id_s.parse::<i32>() {
                    Ok(id) => match planner.delete_task(id) {
                        Ok(true) => {
                            println!("Deleted task {id}.");
                            println!("{}", render_df_as_text_table(planner.dataframe()));
                        }
                        Ok(false) => println!("Task {id} not found."),
                        Err(e) => println!("Error deleting task: {}", e),
                    },
                    Err(_) => println!("Invalid id"),
                },
                None => println!("Usage: delete <id>"),
            },
            "dest" => {
                let rest: Vec<&str> = parts.collect();
                if rest.is_empty() {
                    println!("Usage: dest <text...>");
                    continue;
                }
                let destination = rest.join(" ");
                planner.set_destination(destination);
                println!("Destination set.");
            }
            "presets" => print_presets(),
            "preset" => match parts.next() {
                Some(n_s) => match n_s.parse::<usize>() {
                    Ok(n) if (1..=Planner::DESTINATION_PRESETS.len()).contains(&n) => {
                        let preset = Planner::DESTINATION_PRESETS[n - 1];
                        planner.set_destination(preset);
                        println!("Destination set to {preset}.");
                    }
                    _ => println!(
                        "Invalid preset (1-{})",
                        Planner::DESTINATION_PRESETS.len()
                    ),
                },
                None => println!("Usage: preset <n>"),
            },
            "arrive" => match parts.next() {
                Some(time_s) => match NaiveTime::parse_from_str(time_s, "%H:%M") {
                    Ok(arrival) => {
                        planner.set_arrival_time(arrival);
                        println!("Arrival time set to {}.", arrival.format("%H:%M"));
                    }
                    Err(_) => println!("Invalid time (HH:MM)"),
                },
                None => println!("Usage: arrive <HH:MM>"),
            },
            "transport" => match parts.next() {
                Some(key) => match planner.set_transport(key) {
                    Ok(_) => println!("Transport set to {key}."),
                    Err(e) => {
                        println!("{}", e);
                        print_transports(&planner);
                    }
                },
                None => println!("Usage: transport <key>"),
            },
            "transports" => match parts.next() {
                Some("show") | None => print_transports(&planner),
                Some("default") => {
                    planner.reset_transport_table_to_default();
                    println!("Transport table reset to default.");
                    print_transports(&planner);
                }
                Some("set") => {
                    let path = parts.next();
                    match path {
                        Some(path) => match fs::read_to_string(path) {
                            Ok(contents) => {
                                match serde_json::from_str::<TransportTableConfig>(&contents) {
                                    Ok(config) => {
                                        match planner.set_transport_table_from_config(&config) {
                                            Ok(_) => {
                                                println!("Transport table updated from {}.", path);
                                                print_transports(&planner);
                                            }
                                            Err(e) => {
                                                println!("Error applying transport table: {}", e)
                                            }
                                        }
                                    }
                                    Err(e) => println!("Invalid transport JSON: {}", e),
                                }
                            }
                            Err(e) => println!("Error reading {}: {}", path, e),
                        },
                        None => println!("Usage: transports set <json_path>"),
                    }
                }
                Some("save") => {
                    let path = parts.next();
                    match path {
                        Some(path) => {
                            let config = planner.transport_table_config();
                            match serde_json::to_string_pretty(&config) {
                                Ok(json) => match fs::write(path, json) {
                                    Ok(_) => println!("Transport table saved to {}.", path),
                                    Err(e) => println!("Error writing {}: {}", path, e),
                                },
                                Err(e) => println!("Error serializing transport table: {}", e),
                            }
                        }
                        None => println!("Usage: transports save <json_path>"),
                    }
                }
                Some(other) => {
                    println!("Unknown transports command '{}'.", other);
                    println!("Usage: transports show|default|set <json_path>|save <json_path>");
                }
            },
            "traffic" => match parts.next().and_then(parse_on_off) {
                Some(enabled) => {
                    planner.set_consider_traffic(enabled);
                    println!(
                        "Traffic adjustment {}.",
                        if enabled { "enabled" } else { "disabled" }
                    );
                }
                None => println!("Usage: traffic <on|off>"),
            },
            "dark" => match parts.next().and_then(parse_on_off) {
                Some(enabled) => {
                    planner.set_dark_mode(enabled);
                    println!(
                        "Dark mode {}.",
                        if enabled { "enabled" } else { "disabled" }
                    );
                }
                None => println!("Usage: dark <on|off>"),
            },
            "settings" => print_settings(&planner),
            "calc" => match planner.calculate(Local::now().date_naive()) {
                Ok(plan) => {
                    println!(
                        "Leave home by {}, wake up by {}.",
                        plan.departure.format("%H:%M"),
                        plan.wake_up.format("%H:%M")
                    );
                    println!(
                        "Preparation: {} min, travel: {} min.",
                        plan.prep_minutes, plan.travel_minutes
                    );
                }
                Err(e) => println!("Error: {}", e),
            },
            "history" => print_history(&planner),
            "use" => match parts.next() {
                Some(id_s) => match id_s.parse::<i64>() {
                    Ok(id) => {
                        if planner.apply_history_entry(id) {
                            println!("History entry {id} applied.");
                            print_settings(&planner);
                        } else {
                            println!("History entry {id} not found.");
                        }
                    }
                    Err(_) => println!("Invalid id"),
                },
                None => println!("Usage: use <id>"),
            },
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
