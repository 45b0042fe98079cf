use hmmtag::{hmm::decoder::viterbi, train, Dataset, Error, HmmModel, Smoothing};

fn corpus() -> Dataset {
    Dataset::from_lines(
        "the\tDT
dog\tNN
barks\tVB

the\tDT
cat\tNN
sleeps\tVB

I\tPRP
saw\tVB
the\tDT
saw\tNN
"
        .lines(),
    )
}

#[test]
fn add_one_transition_rows_sum_to_one() {
    let model = train(&corpus(), Smoothing::AddOne, 0.8).expect("failed to train");
    let l = model.num_tags();
    // Every row, including the start-of-sentence row and rows for tags never
    // observed as a predecessor, is a proper distribution.
    for prev in 0..=l {
        let sum: f64 = (0..l).map(|next| model.transition(prev, next).exp()).sum();
        assert!((sum - 1.0).abs() < 1e-9, "row {} sums to {}", prev, sum);
    }
}

#[test]
fn interpolated_rows_sum_to_at_most_one() {
    let model = train(&corpus(), Smoothing::Interpolated, 0.8).expect("failed to train");
    let l = model.num_tags();
    for prev in 0..=l {
        let sum: f64 = (0..l)
            .map(|next| model.transition(prev, next))
            .filter(|lp| lp.is_finite())
            .map(f64::exp)
            .sum();
        assert!(sum <= 1.0 + 1e-9, "row {} sums to {}", prev, sum);
    }
}

#[test]
fn model_roundtrips_through_json() {
    let model = train(&corpus(), Smoothing::Interpolated, 0.8).expect("failed to train");
    let path = std::env::temp_dir().join("hmmtag_roundtrip_model.json");
    model.save(&path).expect("failed to save model");
    let back = HmmModel::load(&path).expect("failed to load model");
    std::fs::remove_file(&path).ok();

    assert_eq!(back.num_tags(), model.num_tags());
    assert_eq!(back.words.len(), model.words.len());
    let words = ["I", "saw", "the", "dog"];
    let (path_a, score_a) = viterbi(&model, &words);
    let (path_b, score_b) = viterbi(&back, &words);
    assert_eq!(path_a, path_b);
    assert!((score_a - score_b).abs() < 1e-12);
}

#[test]
fn loading_garbage_is_an_invalid_model_error() {
    let path = std::env::temp_dir().join("hmmtag_garbage_model.json");
    std::fs::write(&path, b"lCRFabcdefg").expect("failed to write file");
    let ret = HmmModel::load(&path);
    std::fs::remove_file(&path).ok();
    match ret {
        Err(Error::InvalidModel(..)) => {}
        other => panic!("expected InvalidModel, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn training_on_unlabeled_corpus_fails() {
    let ds = Dataset::from_lines("the\ndog\nbarks\n".lines());
    match train(&ds, Smoothing::AddOne, 0.8) {
        Err(Error::EmptyDataset) => {}
        other => panic!("expected EmptyDataset, got {:?}", other.map(|_| ())),
    }
}
