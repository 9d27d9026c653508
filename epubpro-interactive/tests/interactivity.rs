#![allow(clippy::expect_used, reason = "Fine in tests")]
use epubpro_interactive::{
  Document,
  InteractivityProcessor,
  Labels,
  dom,
  gabarito,
  inject::{self, CHECK_CLASS, COMMENT_PARAGRAPH_CLASS, CORRECT_CLASS},
  script,
};

fn page(body: &str) -> String {
  format!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE html>\n<html \
     xmlns=\"http://www.w3.org/1999/xhtml\"><head><title>t</title></head><body>\
     {body}</body></html>"
  )
}

const MULTIPLE_CHOICE: &str = "<p class=\"_c-Atividade-Enunciado\">1. Qual é a \
                               capital?</p>\n<p \
                               class=\"_b-Atividade-alternativa\">a) \
                               Recife</p>\n<p \
                               class=\"_b-Atividade-alternativa\">b) \
                               Brasília</p>\n<p \
                               class=\"_r-Atividade-Resposta\">Resposta</p>\n\
                               <h2>Respostas das atividades</h2>\n<p>Atividade \
                               01</p>\n<p>Resposta: B</p>\n<p>Comentário: A \
                               capital é <em>Brasília</em>.</p>";

fn by_id(document: &Document, id: &str) -> Vec<kuchikikiki::NodeRef> {
  document
    .elements()
    .into_iter()
    .filter(|node| dom::attr(node, "id").as_deref() == Some(id))
    .collect()
}

fn radios(document: &Document) -> Vec<kuchikikiki::NodeRef> {
  document
    .elements_named(&["input"])
    .into_iter()
    .filter(|node| dom::attr(node, "type").as_deref() == Some("radio"))
    .collect()
}

#[test]
fn bound_prompt_gets_one_of_each_block() {
  let processor = InteractivityProcessor::default();
  let result = processor.process_markup(&page(MULTIPLE_CHOICE));
  let output = Document::parse(&result.markup);

  for id in ["opc1E", "opc1C", "opc1R", "opc1D"] {
    assert_eq!(by_id(&output, id).len(), 1, "expected one #{id}");
  }
  assert_eq!(result.report.injection.bound, 1);
  assert_eq!(result.report.injection.radios, 2);
  assert_eq!(result.report.activities, vec![1]);
  assert!(result.report.script_added);

  // The reveal marker paragraph is consumed; only the control's label keeps
  // its class
  let markers = output.elements_with_class(inject::REVEAL_CLASS);
  assert_eq!(markers.len(), 1);
  assert_eq!(
    dom::attr(&markers[0].parent().expect("parent"), "id").as_deref(),
    Some("opc1R")
  );
}

#[test]
fn correct_option_shows_the_correct_block_first() {
  let processor = InteractivityProcessor::default();
  let result = processor.process_markup(&page(MULTIPLE_CHOICE));
  let output = Document::parse(&result.markup);

  let radios = radios(&output);
  assert_eq!(radios.len(), 2);

  let a = &radios[0];
  assert_eq!(dom::attr(a, "name").as_deref(), Some("opc1"));
  assert_eq!(dom::attr(a, "value").as_deref(), Some("a"));
  assert_eq!(
    dom::attr(a, "onclick").as_deref(),
    Some("showMe('opc1E', 'opc1C', 'opc1R', 'opc1D')")
  );

  let b = &radios[1];
  assert_eq!(dom::attr(b, "value").as_deref(), Some("b"));
  assert_eq!(
    dom::attr(b, "onclick").as_deref(),
    Some("showMe('opc1C', 'opc1E', 'opc1R', 'opc1D')")
  );

  // Radio is the option's first child
  let option = b.parent().expect("option");
  assert_eq!(option.first_child().as_ref(), Some(b));
}

#[test]
fn feedback_blocks_quote_answer_and_comment() {
  let processor = InteractivityProcessor::default();
  let result = processor.process_markup(&page(MULTIPLE_CHOICE));
  let output = Document::parse(&result.markup);

  let reveal = &by_id(&output, "opc1R")[0];
  assert_eq!(
    dom::attr(reveal, "onclick").as_deref(),
    Some("showMe('opc1D', 'opc1E', 'opc1R', 'opc1C')")
  );
  assert_eq!(reveal.text_contents(), "Confira aqui a resposta");

  let incorrect = &by_id(&output, "opc1E")[0];
  assert_eq!(
    incorrect.text_contents(),
    "Resposta incorreta. A alternativa correta é a \"B\".A capital é \
     Brasília."
  );
  assert!(dom::has_descendant(incorrect, "hr"));

  let correct = &by_id(&output, "opc1C")[0];
  assert!(dom::has_class(correct, CORRECT_CLASS));
  assert_eq!(
    correct.text_contents(),
    "Resposta correta.A capital é Brasília."
  );

  let check = &by_id(&output, "opc1D")[0];
  assert!(dom::has_class(check, CHECK_CLASS));
  assert_eq!(
    check.text_contents(),
    "A alternativa correta é a \"B\".A capital é Brasília."
  );
  assert!(dom::inner_markup(check).contains("<em>Brasília</em>"));
}

#[test]
fn blocks_are_inserted_in_order_where_the_marker_was() {
  let processor = InteractivityProcessor::default();
  let result = processor.process_markup(&page(MULTIPLE_CHOICE));
  let output = Document::parse(&result.markup);

  let reveal = &by_id(&output, "opc1R")[0];
  let ids: Vec<String> = dom::following_elements(reveal)
    .iter()
    .take(3)
    .filter_map(|node| dom::attr(node, "id"))
    .collect();
  assert_eq!(ids, vec!["opc1E", "opc1C", "opc1D"]);

  let previous = reveal
    .preceding_siblings()
    .find(|node| node.as_element().is_some())
    .expect("option before the control");
  assert!(dom::has_class(&previous, inject::OPTION_CLASS));
}

#[test]
fn missing_reveal_marker_keeps_radios_only() {
  let body = "<p class=\"_c-Atividade-Enunciado\">2) Escolha</p>\
              <p class=\"_b-Atividade-alternativa\">a) Um</p>\
              <p class=\"_b-Atividade-alternativa\">b) Dois</p>\
              <p class=\"_c-Atividade-Enunciado\">3) Outra</p>\
              <p class=\"_r-Atividade-Resposta\">Resposta</p>\
              <h2>Respostas das atividades</h2>\
              <p>Atividade 2</p><p>Resposta: A</p>";
  let processor = InteractivityProcessor::default();
  let result = processor.process_markup(&page(body));
  let output = Document::parse(&result.markup);

  for id in ["opc2E", "opc2C", "opc2R", "opc2D"] {
    assert!(by_id(&output, id).is_empty(), "unexpected #{id}");
  }
  assert_eq!(radios(&output).len(), 2);
  assert_eq!(result.report.injection.partial, 1);
  // Prompt 3 has no record: its marker stays in place
  assert_eq!(result.report.injection.skipped, 1);
  assert_eq!(output.elements_with_class(inject::REVEAL_CLASS).len(), 1);
}

#[test]
fn open_ended_prompt_shows_model_answer() {
  let body = "<p class=\"_c-Atividade-Enunciado\">4. Explique.</p>\
              <p class=\"_r-Atividade-Resposta\">Resposta</p>\
              <h2>Respostas das atividades</h2>\
              <p>Atividade 4</p>\
              <p>Resposta: Porque <strong>sim</strong>.</p>\
              <p>Comentário: Discuta em grupo.</p>";
  let processor = InteractivityProcessor::default();
  let result = processor.process_markup(&page(body));
  let output = Document::parse(&result.markup);

  assert!(radios(&output).is_empty());

  let check = &by_id(&output, "opc4D")[0];
  let paragraphs: Vec<String> = check
    .children()
    .filter(|node| dom::has_class(node, COMMENT_PARAGRAPH_CLASS))
    .map(|node| dom::inner_markup(&node))
    .collect();
  assert_eq!(paragraphs, vec![
    "Porque <strong>sim</strong>.".to_string(),
    "Discuta em grupo.".to_string(),
  ]);

  // No quoted option for open-ended prompts
  let incorrect = &by_id(&output, "opc4E")[0];
  assert!(!incorrect.text_contents().contains("alternativa"));
}

#[test]
fn empty_comment_leaves_comment_paragraph_empty() {
  let body = "<p class=\"_c-Atividade-Enunciado\">5. Qual?</p>\
              <p class=\"_b-Atividade-alternativa\">a) X</p>\
              <p class=\"_r-Atividade-Resposta\">Resposta</p>\
              <h2>Respostas das atividades</h2>\
              <p>Atividade 5</p><p>Resposta: A</p>";
  let processor = InteractivityProcessor::default();
  let result = processor.process_markup(&page(body));
  let output = Document::parse(&result.markup);

  let correct = &by_id(&output, "opc5C")[0];
  let comment = correct
    .children()
    .find(|node| dom::has_class(node, COMMENT_PARAGRAPH_CLASS))
    .expect("comment paragraph");
  assert_eq!(dom::inner_markup(&comment), "");
}

#[test]
fn custom_labels_are_used() {
  let labels = Labels {
    reveal: "Check the answer".to_string(),
    correct: "Correct.".to_string(),
    incorrect: "Incorrect. The right option is".to_string(),
    check: "The right option is".to_string(),
  };
  let body = "<p class=\"_c-Atividade-Enunciado\">1. Which?</p>\
              <p class=\"_b-Atividade-alternativa\">a) This</p>\
              <p class=\"_b-Atividade-alternativa\">b) That</p>\
              <p class=\"_r-Atividade-Resposta\">Answer</p>\
              <h2>Answers to the activities</h2>\
              <p>Activity 1</p><p>Answer: A</p><p>Comment: Obvious.</p>";
  let processor = InteractivityProcessor::new(labels);
  let result = processor.process_markup(&page(body));
  let output = Document::parse(&result.markup);

  assert_eq!(by_id(&output, "opc1R")[0].text_contents(), "Check the answer");
  assert_eq!(
    by_id(&output, "opc1D")[0].text_contents(),
    "The right option is \"A\".Obvious."
  );
}

#[test]
fn reprocessing_does_not_duplicate_the_script() {
  let processor = InteractivityProcessor::default();
  let first = processor.process_markup(&page(MULTIPLE_CHOICE));
  let second = processor.process_markup(&first.markup);

  assert!(!second.report.script_added);
  assert_eq!(second.markup.matches("function showMe").count(), 1);
  assert_eq!(second.markup.matches(script::JQUERY_SRC).count(), 1);
}

#[test]
fn answer_key_section_is_kept_in_the_output() {
  let processor = InteractivityProcessor::default();
  let result = processor.process_markup(&page(MULTIPLE_CHOICE));

  assert!(result.markup.contains("<h2>Respostas das atividades</h2>"));
  assert!(result.markup.contains("<p>Atividade 01</p>"));
  assert!(result.markup.contains("<p>Resposta: B</p>"));
  assert_eq!(result.report.answer_key_elements, 4);
}

#[test]
fn xml_declaration_and_doctype_survive() {
  let processor = InteractivityProcessor::default();
  let result = processor.process_markup(&page(MULTIPLE_CHOICE));

  assert!(
    result
      .markup
      .starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>")
  );
  assert!(result.markup.contains("<!DOCTYPE html>"));
  assert!(result.markup.contains("<hr class=\"resposta\"/>"));
}

#[test]
fn extraction_strips_labels_and_joins_comments() {
  let document = Document::parse(&page(
    "<h2>Respostas das atividades</h2>\
     <p>Atividade 07</p>\
     <p>Resposta: C</p>\
     <p>Comentário: texto</p>\
     <p>mais texto</p>\
     <p>Atividade 08</p>",
  ));
  let extraction = gabarito::extract(&document);

  let record = &extraction.records[&7];
  assert_eq!(record.answer, "C");
  assert_eq!(record.comment, "texto mais texto");
  assert!(extraction.records[&8].answer.is_empty());
}

#[test]
fn later_answer_line_overwrites() {
  let document = Document::parse(&page(
    "<p>Atividade 1</p><p>Resposta: A</p><p>Resposta: D</p>",
  ));
  let extraction = gabarito::extract(&document);
  assert_eq!(extraction.records[&1].answer, "D");
}

#[test]
fn references_heading_stops_tracking() {
  let document = Document::parse(&page(
    "<h2>Respostas das Atividades</h2>\
     <p>Atividade 1</p><p>Resposta: A</p>\
     <h2>Referências Bibliográficas</h2>\
     <p>Resposta: B</p>\
     <p>SILVA, J. Atividade física. 2020.</p>",
  ));
  let extraction = gabarito::extract(&document);

  assert_eq!(extraction.records.len(), 1);
  assert_eq!(extraction.records[&1].answer, "A");
  // Heading, activity line and answer line; the references heading is out
  assert_eq!(extraction.answer_key_section.len(), 3);
}

#[test]
fn citation_after_references_does_not_extend_a_record() {
  let document = Document::parse(&page(
    "<h2>Respostas das atividades</h2>\
     <p>Atividade 1</p><p>Resposta: A</p><p>Comentário: ok</p>\
     <h3>Bibliografia</h3>\
     <p>SILVA, J. Ver Atividade 1 do manual.</p>\
     <p>Comentário: citado</p>",
  ));
  let extraction = gabarito::extract(&document);

  assert_eq!(extraction.records.len(), 1);
  assert_eq!(extraction.records[&1].comment, "ok");
  assert_eq!(extraction.answer_key_section.len(), 4);
}

#[test]
fn line_initial_citation_after_references_is_not_an_activity() {
  let body = "<p class=\"_c-Atividade-Enunciado\">3. Explique a fotossíntese.</p>\
              <p class=\"_r-Atividade-Resposta\">Resposta</p>\
              <h2>Respostas das atividades</h2>\
              <p>Atividade 1</p><p>Resposta: A</p>\
              <h2>Referências</h2>\
              <p>Atividade 3 do livro X, 2020.</p>\
              <p>Resposta: citada</p>";
  let document = Document::parse(&page(body));
  let extraction = gabarito::extract(&document);

  assert_eq!(extraction.records.keys().copied().collect::<Vec<_>>(), vec![1]);
  assert_eq!(extraction.records[&1].answer, "A");

  let report = inject::inject(&document, &extraction.records, &Labels::default());
  assert_eq!(report.bound, 0);
  assert_eq!(report.skipped, 1);
}

#[test]
fn answer_key_heading_after_references_resumes_tracking() {
  let document = Document::parse(&page(
    "<h2>Referências</h2>\
     <p>Atividade 9 do manual.</p>\
     <h2>Respostas das atividades</h2>\
     <p>Atividade 2</p><p>Resposta: C</p>",
  ));
  let extraction = gabarito::extract(&document);

  assert_eq!(extraction.records.len(), 1);
  assert_eq!(extraction.records[&2].answer, "C");
}

#[test]
fn cover_page_with_svg_and_math_stays_well_formed() {
  let markup = page(
    "<div class=\"cover\"><svg xmlns=\"http://www.w3.org/2000/svg\" \
     xmlns:xlink=\"http://www.w3.org/1999/xlink\" version=\"1.1\" \
     viewBox=\"0 0 1200 1600\"><image width=\"1200\" height=\"1600\" \
     xlink:href=\"../Images/cover.jpg\"/></svg></div>\
     <p>Área: <math xmlns=\"http://www.w3.org/1998/Math/MathML\">\
     <msup><mi>r</mi><mn>2</mn></msup></math></p>",
  );
  let result = InteractivityProcessor::default().process_markup(&markup);

  // The script is added, so the document is rewritten
  assert!(result.report.changed());
  assert!(!result.markup.contains(" :xmlns="));
  assert!(result.markup.contains("<svg xmlns=\"http://www.w3.org/2000/svg\""));
  assert!(result.markup.contains("xlink:href=\"../Images/cover.jpg\""));
  assert!(
    result
      .markup
      .contains("<math xmlns=\"http://www.w3.org/1998/Math/MathML\">")
  );
  assert!(
    roxmltree::Document::parse_with_options(&result.markup, roxmltree::ParsingOptions {
      allow_dtd: true,
      ..roxmltree::ParsingOptions::default()
    })
    .is_ok(),
    "not well-formed XML: {}",
    result.markup
  );
}

#[test]
fn prompt_without_record_is_untouched() {
  let body = "<p class=\"_c-Atividade-Enunciado\">9. Sem gabarito</p>\
              <p class=\"_b-Atividade-alternativa\">a) X</p>\
              <p class=\"_r-Atividade-Resposta\">Resposta</p>";
  let document = Document::parse(&page(body));
  let before = document.to_xhtml();

  let extraction = gabarito::extract(&document);
  let report = inject::inject(&document, &extraction.records, &Labels::default());

  assert_eq!(report.skipped, 1);
  assert_eq!(report.radios, 0);
  assert_eq!(document.to_xhtml(), before);
}
