use clap::{App, Arg};
use rustsmt::{decide_euf, decide_lazy, Expr, SmtResult, Term};

fn main() {
    env_logger::init();

    let matches = App::new("rustsmt")
        .arg(
            Arg::with_name("MODE")
                .help("which demos to run: euf, lazy, or all (default)")
                .index(1),
        )
        .get_matches();
    let mode = matches.value_of("MODE").unwrap_or("all");

    let a = Term::constant("a");
    let b = Term::constant("b");
    let c = Term::constant("c");
    let fa = Term::apply("f", vec![a.clone()]);
    let fb = Term::apply("f", vec![b.clone()]);

    if mode == "euf" || mode == "all" {
        let conjunctions = vec![
            Expr::eq(a.clone(), b.clone()),
            Expr::and(vec![Expr::eq(a.clone(), b.clone()), Expr::neq(a.clone(), b.clone())]),
            Expr::and(vec![Expr::eq(a.clone(), b.clone()), Expr::neq(fa.clone(), fb.clone())]),
            Expr::and(vec![
                Expr::eq(a.clone(), b.clone()),
                Expr::eq(b.clone(), c.clone()),
                Expr::neq(a.clone(), c.clone()),
            ]),
        ];
        for phi in &conjunctions {
            report(phi, decide_euf(phi));
        }
    }

    if mode == "lazy" || mode == "all" {
        let formulas = vec![
            Expr::or(vec![Expr::eq(a.clone(), b.clone()), Expr::eq(b.clone(), c.clone())]),
            Expr::and(vec![
                Expr::or(vec![Expr::eq(a.clone(), b.clone()), Expr::eq(b.clone(), c.clone())]),
                Expr::neq(a.clone(), c.clone()),
            ]),
            Expr::and(vec![
                Expr::or(vec![Expr::eq(a.clone(), b.clone()), Expr::eq(a.clone(), c.clone())]),
                Expr::neq(fa.clone(), fb.clone()),
                Expr::neq(a.clone(), c.clone()),
            ]),
        ];
        for phi in &formulas {
            match decide_lazy(phi) {
                Ok(result) => report(phi, result),
                Err(e) => {
                    eprintln!("oracle error: {:?}", e);
                    std::process::exit(-1);
                }
            }
        }
    }
}

fn report(phi: &Expr, result: SmtResult) {
    match result {
        SmtResult::Satisfiable(witness) => {
            println!("sat    {}", phi);
            println!("       witness: {}", Expr::and(witness));
        }
        SmtResult::Unsatisfiable => println!("unsat  {}", phi),
    }
}
