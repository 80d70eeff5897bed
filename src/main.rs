use issen_heuristics::batch::*;
use issen_heuristics::board::*;
use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, Command};

fn main() -> Result<()> {
    let arg_input_file = Arg::new("INPUT").short('i').required(true);
    let arg_output_file = Arg::new("OUTPUT").short('o');
    let matches = Command::new("Issen-heuristics")
        .about("Token counting evaluators for 8x8 reversi positions")
        .subcommand(
            Command::new("eval")
                .about("Evaluate positions from a file")
                .arg(arg_input_file.clone())
                .arg(Arg::new("config").short('c').long("config"))
                .arg(
                    Arg::new("heuristic")
                        .short('e')
                        .long("heuristic")
                        .help("null | token-count"),
                )
                .arg(
                    Arg::new("perspective")
                        .short('p')
                        .long("perspective")
                        .help("side-to-move | black | white"),
                )
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue))
                .arg(
                    Arg::new("threads")
                        .short('j')
                        .long("threads")
                        .value_parser(value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("parse-board")
                .about("Parse board")
                .arg(Arg::new("str").short('b').required(true)),
        )
        .subcommand(
            Command::new("gen-boards")
                .about("Generate random positions")
                .arg(
                    Arg::new("COUNT")
                        .short('n')
                        .required(true)
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("seed")
                        .short('s')
                        .long("seed")
                        .value_parser(value_parser!(u64)),
                )
                .arg(arg_output_file.clone()),
        )
        .get_matches();
    match matches.subcommand() {
        Some(("eval", matches)) => eval_positions(matches),
        Some(("parse-board", matches)) => parse_board(matches),
        Some(("gen-boards", matches)) => gen_boards(matches),
        Some(_) => {
            eprintln!("Unknown subcommand");
            Ok(())
        }
        None => {
            eprintln!("Need subcommand");
            Ok(())
        }
    }
}
