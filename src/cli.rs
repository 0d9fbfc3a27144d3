// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args(cmd: Command) -> Command {
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

fn period_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("period")
            .long("period")
            .default_value("current-month")
            .help("current-month | last-month | year"),
    )
    .arg(Arg::new("from").long("from").help("Range start YYYY-MM-DD (with --to)"))
    .arg(Arg::new("to").long("to").help("Range end YYYY-MM-DD (with --from)"))
}

fn tx_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(Arg::new("date").long("date").help("YYYY-MM-DD (default: today)"))
        .arg(
            Arg::new("type")
                .long("type")
                .required(required)
                .help("Income | Expense"),
        )
        .arg(Arg::new("amount").long("amount").required(required))
        .arg(
            Arg::new("category")
                .long("category")
                .required(required)
                .help("Category id or name"),
        )
        .arg(
            Arg::new("description")
                .long("description")
                .short('d')
                .required(required),
        )
        .arg(
            Arg::new("payment")
                .long("payment")
                .help("Cash | Debit Card | Credit Card | Bank Transfer | Digital Wallet | Other"),
        )
}

pub fn build_cli() -> Command {
    Command::new("finora")
        .version(clap::crate_version!())
        .about("Personal finance tracker: transactions, monthly budgets and reports")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("FINORA_DB")
                .value_parser(value_parser!(std::path::PathBuf))
                .help("Storage file (default: platform data dir)"),
        )
        .subcommand(Command::new("init").about("Create the storage file and seed categories"))
        .subcommand(
            Command::new("auth")
                .about("Simulated sign-in")
                .subcommand(
                    Command::new("login")
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("password").long("password").required(true)),
                )
                .subcommand(
                    Command::new("signup")
                        .arg(Arg::new("first_name").long("first-name").required(true))
                        .arg(Arg::new("last_name").long("last-name"))
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("password").long("password").required(true)),
                )
                .subcommand(Command::new("logout"))
                .subcommand(Command::new("whoami")),
        )
        .subcommand(
            Command::new("profile")
                .about("Personal details of the signed-in user")
                .subcommand(json_args(Command::new("show")))
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("full_name").long("full-name"))
                        .arg(Arg::new("phone").long("phone"))
                        .arg(
                            Arg::new("dob")
                                .long("dob")
                                .help("Date of birth YYYY-MM-DD; empty clears it"),
                        )
                        .arg(Arg::new("location").long("location"))
                        .arg(Arg::new("occupation").long("occupation")),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Income and expense transactions")
                .subcommand(
                    tx_fields(Command::new("add"), true).arg(
                        Arg::new("recurring")
                            .long("recurring")
                            .action(ArgAction::SetTrue),
                    ),
                )
                .subcommand(json_args(
                    Command::new("list")
                        .arg(Arg::new("search").long("search").short('s'))
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("from").long("from"))
                        .arg(Arg::new("to").long("to"))
                        .arg(
                            Arg::new("page")
                                .long("page")
                                .value_parser(value_parser!(usize))
                                .default_value("1"),
                        )
                        .arg(
                            Arg::new("per_page")
                                .long("per-page")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .help("Show every match on one page"),
                        ),
                ))
                .subcommand(json_args(
                    Command::new("show").arg(Arg::new("id").required(true)),
                ))
                .subcommand(
                    tx_fields(Command::new("edit").arg(Arg::new("id").required(true)), false).arg(
                        Arg::new("recurring")
                            .long("recurring")
                            .value_parser(value_parser!(bool)),
                    ),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true))),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly category budgets")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("limit").long("limit").required(true))
                        .arg(Arg::new("month").long("month").help("YYYY-MM (default: this month)")),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("limit").long("limit"))
                        .arg(Arg::new("month").long("month")),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true)))
                .subcommand(json_args(
                    Command::new("list").arg(Arg::new("month").long("month")),
                ))
                .subcommand(json_args(
                    Command::new("status").arg(Arg::new("month").long("month")),
                )),
        )
        .subcommand(
            Command::new("category")
                .about("Category catalog")
                .subcommand(json_args(
                    Command::new("list").arg(Arg::new("type").long("type")),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Period summaries and analytics")
                .subcommand(json_args(period_args(Command::new("summary"))))
                .subcommand(json_args(period_args(
                    Command::new("breakdown")
                        .arg(Arg::new("type").long("type").default_value("Expense")),
                )))
                .subcommand(json_args(
                    Command::new("compare")
                        .arg(
                            Arg::new("period")
                                .long("period")
                                .default_value("current-month"),
                        ),
                ))
                .subcommand(json_args(
                    Command::new("trend")
                        .arg(Arg::new("year").long("year").value_parser(value_parser!(i32))),
                ))
                .subcommand(json_args(period_args(Command::new("insights"))))
                .subcommand(json_args(period_args(
                    Command::new("drivers").about("Largest expense categories"),
                )))
                .subcommand(json_args(Command::new("activity"))),
        )
        .subcommand(
            Command::new("settings")
                .about("Display preferences")
                .subcommand(json_args(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write data to a file")
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv | json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("all").arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for inconsistencies"))
        .subcommand(
            Command::new("reset")
                .about("Clear transactions and budgets")
                .arg(
                    Arg::new("all")
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .help("Also remove user, settings and categories"),
                )
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .help("Required; confirms the reset"),
                ),
        )
}
