//! Scanner and parser benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use estree_parser::{parse, Lexer, ParserOptions, TokenKind};

const SAMPLE_SOURCE: &str = r#"
// Sample module for benchmarking
import { readFile } from "fs/promises";

function fibonacci(n) {
    if (n <= 1) return n;
    return fibonacci(n - 1) + fibonacci(n - 2);
}

class Calculator {
    #result = 0;
    static instances = 0;

    constructor() {
        Calculator.instances++;
    }

    add(x, y = 0) {
        return this.#result = x + y;
    }

    get result() {
        return this.#result;
    }

    async fetchData(url) {
        const response = await fetch(url);
        return response?.json?.() ?? null;
    }
}

const calc = new Calculator();
const numbers = [1, 2, 3, 4, 5].map(n => n ** 2);
const { a, b, ...rest } = { a: 1, b: 2, c: 3, d: 4 };
const template = `Hello ${name}, you have ${count} messages`;
const pattern = /^[a-z]+\d*$/giu;

for await (const line of readFile("input.txt")) {
    label: for (let i = 0; i < line.length; i++) {
        if (line[i] === "#") continue label;
    }
}

export { Calculator, fibonacci };
export default calc;
"#;

fn bench_lexer(c: &mut Criterion) {
    // Without the parser there is nobody to rescan regexes and template
    // continuations, so those lines are left out.
    let source: String = SAMPLE_SOURCE
        .lines()
        .filter(|line| !line.contains('`') && !line.contains("= /"))
        .flat_map(|line| [line, "\n"])
        .collect();

    let mut group = c.benchmark_group("lexer");
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("sample", |b| {
        b.iter(|| {
            let mut lexer = Lexer::new(black_box(&source));
            while let Ok(token) = lexer.next_token() {
                if token.kind == TokenKind::Eof {
                    break;
                }
            }
        });
    });

    group.finish();
}

fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");
    group.throughput(Throughput::Bytes(SAMPLE_SOURCE.len() as u64));

    let options = ParserOptions::module();
    group.bench_function("sample", |b| {
        b.iter(|| parse(black_box(SAMPLE_SOURCE), options));
    });

    let with_loc = options.with_loc(true);
    group.bench_function("sample_with_loc", |b| {
        b.iter(|| parse(black_box(SAMPLE_SOURCE), with_loc));
    });

    group.finish();
}

criterion_group!(benches, bench_lexer, bench_parser);
criterion_main!(benches);
