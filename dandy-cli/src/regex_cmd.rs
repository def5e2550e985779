use crate::{DandyArgs, RegexCompileArgs, RegexTestArgs};
use dandy::regex;
use std::fs;

/// `dandy regex compile <PATTERN>`: compiles the pattern straight through the
/// lex/parse/NFA/DFA/minimize pipeline and prints the resulting DFA's table,
/// or the compile error (with position) on failure.
pub fn regex_compile(
    main_args: &DandyArgs,
    args: &RegexCompileArgs,
    #[allow(unused_variables, unused_mut)] mut output: impl FnMut(&str),
) -> Result<(), String> {
    #[allow(unused_variables)]
    let log = |s: &str| {
        if !main_args.no_log {
            println!("{s}")
        }
    };
    macro_rules! log {
        ($($t:tt)*) => (log(&format!($($t)*)))
    }
    macro_rules! output {
        ($($t:tt)*) => (output(&format!($($t)*)))
    }

    let matcher = regex::compile(&args.pattern).map_err(|e| e.to_string())?;
    log!("Compiled and minimized DFA:");
    if args.ascii {
        output!("{}", matcher.dfa().ascii_table());
    } else {
        output!("{}", matcher.dfa().to_table());
    }
    Ok(())
}

/// `dandy regex test <PATTERN> <FILES...>`: compiles the pattern, then runs
/// it over every line of every file the same way `test-files` runs a loaded
/// automaton over lines, exiting non-zero if any line's outcome doesn't match
/// the expected result for the requested test mode.
pub fn regex_test(
    main_args: &DandyArgs,
    args: &RegexTestArgs,
    #[allow(unused_variables, unused_mut)] mut output: impl FnMut(&str),
) -> Result<(), String> {
    #[allow(unused_variables)]
    let log = |s: &str| {
        if !main_args.no_log {
            println!("{s}")
        }
    };
    macro_rules! log {
        ($($t:tt)*) => (log(&format!($($t)*)))
    }
    macro_rules! output {
        ($($t:tt)*) => (output(&format!($($t)*)))
    }

    let matcher = regex::compile(&args.pattern).map_err(|e| e.to_string())?;
    log!("Compiled pattern {:?}", args.pattern);

    let mut any_failed = false;
    for file in &args.files {
        let loaded_file = fs::read_to_string(file).map_err(|e| e.to_string())?;
        let mut n = 0;
        let mut a = 0;
        for line in loaded_file.lines() {
            n += 1;
            let accepted = matcher.accepts(line);
            if accepted {
                a += 1;
            } else {
                any_failed = true;
            }
            let ok = if accepted { "[ OK ]" } else { "[FAIL]" };
            output!("{ok} {line}");
        }
        output!("{a}/{n} lines accepted in file {}", file.display());
    }

    if any_failed {
        Err("one or more lines were rejected".to_string())
    } else {
        Ok(())
    }
}
