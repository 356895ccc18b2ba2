// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .help("Calendar month (defaults to the current month)")
}

pub fn build_cli() -> Command {
    Command::new("bankdash")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Link bank accounts, cache transactions locally, and report spending")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("PATH")
                .help("Config file (defaults to the platform config dir)"),
        )
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_name("PATH")
                .help("SQLite cache location"),
        )
        .arg(
            Arg::new("api-base")
                .long("api-base")
                .global(true)
                .value_name("URL")
                .help("Base URL of the aggregation backend"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging"),
        )
        .subcommand(Command::new("init").about("Create the local cache"))
        .subcommand(
            Command::new("link")
                .about("Connect a bank account")
                .subcommand_required(true)
                .subcommand(Command::new("token").about("Request a link token for the hosted widget"))
                .subcommand(
                    Command::new("exchange")
                        .about("Exchange the widget's public token and run a first sync")
                        .arg(
                            Arg::new("public-token")
                                .long("public-token")
                                .required(true)
                                .value_name("TOKEN"),
                        ),
                ),
        )
        .subcommand(Command::new("sync").about("Fetch new transactions since the last sync"))
        .subcommand(json_flags(
            Command::new("dashboard")
                .about("Sync and show accounts, cash flow, spending and recurring items")
                .arg(month_arg()),
        ))
        .subcommand(
            Command::new("tx")
                .about("Cached transactions")
                .subcommand_required(true)
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("from").long("from").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("to").long("to").value_name("YYYY-MM-DD"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("account")
                .about("Cached accounts")
                .subcommand_required(true)
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("recurring")
                .about("Recurring income and expense streams")
                .subcommand_required(true)
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("all")
                            .long("all")
                            .action(ArgAction::SetTrue)
                            .help("Include inactive streams"),
                    ),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Summaries over cached transactions")
                .subcommand_required(true)
                .subcommand(json_flags(
                    Command::new("spend-by-category").arg(month_arg()),
                ))
                .subcommand(json_flags(Command::new("cashflow").arg(month_arg())))
                .subcommand(json_flags(
                    Command::new("monthly").arg(
                        Arg::new("months")
                            .long("months")
                            .value_parser(value_parser!(usize))
                            .default_value("12"),
                    ),
                )),
        )
        .subcommand(
            Command::new("budget")
                .about("Budgets")
                .subcommand_required(true)
                .subcommand(
                    Command::new("create")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("timeframe")
                                .long("timeframe")
                                .default_value("monthly")
                                .help("weekly|monthly|yearly"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .required(true)
                                .action(ArgAction::Append)
                                .value_name("CATEGORY=AMOUNT"),
                        )
                        .arg(
                            Arg::new("inactive")
                                .long("inactive")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("theme")
                .about("Light/dark table colours")
                .subcommand_required(true)
                .subcommand(Command::new("show"))
                .subcommand(Command::new("toggle"))
                .subcommand(
                    Command::new("set").arg(
                        Arg::new("theme")
                            .required(true)
                            .value_parser(["light", "dark"]),
                    ),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export cached data")
                .subcommand_required(true)
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check the local cache for problems"))
        .subcommand(
            Command::new("reset")
                .about("Drop all cached records and the sync cursor")
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .help("Confirm"),
                ),
        )
}
