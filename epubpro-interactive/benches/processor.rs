#![allow(
  clippy::expect_used,
  clippy::unwrap_used,
  reason = "Fine in benchmarks"
)]
use std::{fmt::Write, hint::black_box};

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use epubpro_interactive::{Document, InteractivityProcessor, gabarito};

/// A chapter with `activities` multiple-choice prompts followed by their
/// answer key.
fn chapter(activities: u32) -> String {
  let mut body = String::new();
  for n in 1..=activities {
    write!(
      body,
      "<p class=\"_c-Atividade-Enunciado\">{n}. Enunciado da atividade \
       {n}.</p>\n<p class=\"_b-Atividade-alternativa\">a) Primeira</p>\n<p \
       class=\"_b-Atividade-alternativa\">b) Segunda</p>\n<p \
       class=\"_b-Atividade-alternativa\">c) Terceira</p>\n<p \
       class=\"_r-Atividade-Resposta\">Resposta</p>\n<p>Texto corrido entre \
       atividades, com <em>ênfase</em>.</p>\n"
    )
    .unwrap();
  }
  body.push_str("<h2>Respostas das atividades</h2>\n");
  for n in 1..=activities {
    let letter = ['A', 'B', 'C'][(n % 3) as usize];
    write!(
      body,
      "<p>Atividade {n}</p>\n<p><strong>Resposta:</strong> {letter}</p>\n\
       <p>Comentário: a alternativa {letter} é a correta.</p>\n<p>Continuação \
       do comentário.</p>\n"
    )
    .unwrap();
  }
  body.push_str("<h2>Referências</h2>\n<p>Autor. Atividade 1 de um livro.</p>\n");

  format!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE html>\n<html \
     xmlns=\"http://www.w3.org/1999/xhtml\"><head><title>Capítulo</title></head>\
     <body>\n{body}</body></html>"
  )
}

fn bench_processor(c: &mut Criterion) {
  let mut group = c.benchmark_group("interactivity");
  let processor = InteractivityProcessor::default();

  for activities in [5, 50] {
    let markup = chapter(activities);

    group.bench_with_input(
      BenchmarkId::new("extract", activities),
      &markup,
      |b, markup| {
        let document = Document::parse(markup);
        b.iter(|| gabarito::extract(black_box(&document)));
      },
    );

    group.bench_with_input(
      BenchmarkId::new("process_markup", activities),
      &markup,
      |b, markup| {
        b.iter(|| processor.process_markup(black_box(markup)));
      },
    );
  }

  group.finish();
}

criterion_group!(benches, bench_processor);
criterion_main!(benches);
