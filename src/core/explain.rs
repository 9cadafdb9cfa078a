use crate::core::fallback::{Admission, FiredRung};
use crate::core::filters::violates;
use crate::core::inputs::Inputs;
use crate::core::scoring::ScoredCandidate;
use crate::error::ExplainError;
use crate::models::{
    DimensionScore, Explanation, ExplanationStatus, PreferenceProfile, Verdict,
};
use crate::rubric::{DimensionKind, FilterKey, RelaxationKind, Rubric};
use std::fmt::Write;
use tracing::warn;

/// How a dimension's verdict is judged
enum Judge {
    /// By share of the dimension cap earned
    Ratio,
    /// By a candidate yes/no fact; a miss is disqualifying when `strict`
    Flag { value: Option<bool>, strict: bool },
    /// Nothing is demanded of the user when the flag is false
    NoBurden(Option<bool>),
}

/// What the explanation says about one dimension
struct Facet {
    fact: Option<String>,
    preference: String,
    stated: bool,
    judge: Judge,
}

/// Build explanations, degrading to an empty list on a rendering failure
pub fn explain_or_degrade(
    rubric: &Rubric,
    scored: &ScoredCandidate<'_>,
    profile: &PreferenceProfile,
    admission: &Admission,
) -> (Vec<Explanation>, ExplanationStatus) {
    match explain(rubric, scored, profile, admission) {
        Ok(entries) => (entries, ExplanationStatus::Complete),
        Err(e) => {
            warn!(
                candidate = %scored.candidate.id,
                error = %e,
                "explanation degraded"
            );
            (Vec::new(), ExplanationStatus::Degraded)
        }
    }
}

/// One entry per dimension in rubric order, plus a fallback annotation
///
/// Entries read the same resolved inputs the scorer used.
pub fn explain(
    rubric: &Rubric,
    scored: &ScoredCandidate<'_>,
    profile: &PreferenceProfile,
    admission: &Admission,
) -> Result<Vec<Explanation>, ExplainError> {
    let mut entries = Vec::with_capacity(scored.breakdown.len() + 1);

    for (score, inputs) in scored.breakdown.iter().zip(&scored.inputs) {
        entries.push(dimension_entry(score, inputs, profile)?);
    }

    if let Some(note) = annotation(rubric, scored, profile, admission)? {
        entries.push(note);
    }

    Ok(entries)
}

fn dimension_entry(
    score: &DimensionScore,
    inputs: &Inputs,
    profile: &PreferenceProfile,
) -> Result<Explanation, ExplainError> {
    if !score.points.is_finite() {
        return Err(ExplainError::NonFinite("points"));
    }
    if inputs.value.is_some_and(|v| !v.is_finite()) {
        return Err(ExplainError::NonFinite("candidate value"));
    }

    let facet = facet(score.dimension, inputs, profile)?;
    let verdict = if !facet.stated {
        Verdict::NotApplicable
    } else if facet.fact.is_none() {
        Verdict::Unknown
    } else {
        judge(&facet.judge, score)
    };

    let fact = facet.fact.unwrap_or_else(|| "not published".to_string());
    let mut text = String::new();
    write!(text, "{}: {}", score.dimension.title(), fact)?;
    if facet.stated {
        write!(text, "; you said {}", facet.preference)?;
    } else {
        text.push_str("; no preference stated");
    }
    write!(
        text,
        " ({}, {:.1}/{:.0})",
        verdict.label(),
        score.points,
        score.cap
    )?;

    Ok(Explanation {
        dimension: Some(score.dimension),
        fact,
        preference: facet.preference,
        verdict,
        text,
    })
}

fn judge(judge: &Judge, score: &DimensionScore) -> Verdict {
    match judge {
        Judge::Ratio => ratio_verdict(score),
        Judge::Flag { value, strict } => match value {
            None => Verdict::Unknown,
            Some(true) => Verdict::Meets,
            Some(false) if *strict => Verdict::DoesNotMeet,
            Some(false) => Verdict::PartiallyMeets,
        },
        Judge::NoBurden(Some(false)) => Verdict::Meets,
        Judge::NoBurden(None) => Verdict::Unknown,
        Judge::NoBurden(Some(true)) => ratio_verdict(score),
    }
}

#[inline]
fn ratio_verdict(score: &DimensionScore) -> Verdict {
    let ratio = if score.cap > 0.0 {
        score.points / score.cap
    } else {
        0.0
    };
    if ratio >= 0.999 {
        Verdict::Meets
    } else if ratio >= 0.5 {
        Verdict::PartiallyMeets
    } else {
        Verdict::DoesNotMeet
    }
}

fn yes_no(value: Option<bool>, yes: &str, no: &str) -> Option<String> {
    value.map(|v| if v { yes } else { no }.to_string())
}

fn money(amount: f64) -> String {
    let whole = amount.round() as u64;
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + 4);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("${}", out)
}

fn percent(rate: f64) -> String {
    format!("{:.0}%", rate * 100.0)
}

fn facet(
    kind: DimensionKind,
    inputs: &Inputs,
    profile: &PreferenceProfile,
) -> Result<Facet, ExplainError> {
    let level_stated = inputs.choice != "low";

    let facet = match kind {
        DimensionKind::Academic => {
            let (lo, hi) = inputs.band.unwrap_or((1, 1));
            Facet {
                fact: inputs.value.map(|rank| format!("ranked #{:.0}", rank)),
                preference: format!(
                    "{} (target rank {}-{})",
                    profile.academic_band.label(),
                    lo,
                    hi
                ),
                stated: true,
                judge: Judge::Ratio,
            }
        }
        DimensionKind::Interests => {
            let mut fact = format!("matches {}/{} of your subjects", inputs.matched.len(), inputs.selected);
            if !inputs.matched.is_empty() {
                let shown: Vec<&str> = inputs.matched.iter().take(3).map(String::as_str).collect();
                write!(fact, " ({}", shown.join(", "))?;
                if inputs.matched.len() > 3 {
                    fact.push_str(", ...");
                }
                fact.push(')');
            }
            Facet {
                fact: Some(fact),
                preference: format!("interested in {}", profile.interests.join(", ")),
                stated: inputs.selected > 0,
                judge: Judge::Ratio,
            }
        }
        DimensionKind::Budget => Facet {
            fact: inputs.value.map(|t| format!("tuition {}/year", money(t))),
            preference: inputs
                .limit
                .map(|b| format!("a budget of {}/year", money(b)))
                .unwrap_or_default(),
            stated: inputs.limit.is_some(),
            judge: Judge::Ratio,
        },
        DimensionKind::Internship => Facet {
            fact: yes_no(inputs.flag, "has an internship program", "no formal internship program"),
            preference: format!("internships are {}", profile.generic.internship_importance.label()),
            stated: level_stated,
            judge: Judge::Flag {
                value: inputs.flag,
                strict: inputs.choice == "high",
            },
        },
        DimensionKind::SchoolType => Facet {
            fact: inputs.fact.as_ref().map(|t| format!("{} university", t)),
            preference: format!("a {} school", inputs.choice),
            stated: inputs.choice != "any",
            judge: Judge::Flag {
                value: inputs.flag,
                strict: true,
            },
        },
        DimensionKind::Region => Facet {
            fact: inputs.fact.as_ref().map(|place| format!("located in {}", place)),
            preference: format!("studying in {}", profile.region().unwrap_or("any region")),
            stated: inputs.choice == "stated",
            judge: Judge::Flag {
                value: inputs.flag,
                strict: true,
            },
        },
        DimensionKind::InternationalCommunity => Facet {
            fact: inputs.value.map(|r| format!("{} international students", percent(r))),
            preference: format!(
                "an international community is {}",
                profile.intl_community_importance.label()
            ),
            stated: level_stated,
            judge: Judge::Ratio,
        },
        DimensionKind::ApplicationRound => {
            let early_action = inputs.choice == "early_action";
            let value = if early_action {
                inputs.secondary_flag
            } else {
                inputs.flag
            };
            let (yes, no) = if early_action {
                ("offers Early Action", "no Early Action round")
            } else {
                ("offers Early Decision", "no Early Decision round")
            };
            Facet {
                fact: yes_no(value, yes, no),
                preference: format!("applying {}", profile.generic.application_round.label()),
                stated: matches!(inputs.choice, "early_decision" | "early_action"),
                judge: Judge::Flag {
                    value,
                    strict: true,
                },
            }
        }
        DimensionKind::WorkIntegratedLearning => {
            let mut fact = yes_no(
                inputs.flag,
                "offers work-integrated learning",
                "no work-integrated learning",
            );
            if let (Some(fact), Some(rate)) = (fact.as_mut(), inputs.value) {
                write!(fact, ", {} placement rate", percent(rate))?;
            }
            Facet {
                fact,
                preference: format!("work-integrated learning is {}", profile.australia.wil_preference.label()),
                stated: inputs.choice != "not_important",
                judge: Judge::Flag {
                    value: inputs.flag,
                    strict: inputs.choice == "required",
                },
            }
        }
        DimensionKind::GroupOfEight => Facet {
            fact: yes_no(inputs.flag, "Group of Eight member", "not a Group of Eight member"),
            preference: format!("Go8 membership is {}", profile.australia.go8_preference.label()),
            stated: level_stated,
            judge: Judge::Flag {
                value: inputs.flag,
                strict: inputs.choice == "high",
            },
        },
        DimensionKind::City => Facet {
            fact: inputs.fact.as_ref().map(|city| format!("located in {}", city)),
            preference: format!("studying in {}", profile.australia.cities().join(" or ")),
            stated: inputs.choice == "stated",
            judge: Judge::Flag {
                value: inputs.flag,
                strict: true,
            },
        },
        DimensionKind::PostStudyVisa => Facet {
            fact: inputs.value.map(|y| format!("{:.0}-year post-study work visa", y)),
            preference: format!("post-study work rights are {}", profile.australia.psw_importance.label()),
            stated: level_stated,
            judge: Judge::Ratio,
        },
        DimensionKind::English => {
            let fact = match (inputs.flag, inputs.fact.as_deref()) {
                (Some(true), Some(detail)) => Some(format!("requires an English test ({})", detail)),
                (Some(true), None) => Some("requires an English test".to_string()),
                (Some(false), _) => Some("no English test required".to_string()),
                (None, _) => None,
            };
            let mut preference = format!("your English {}", profile.australia.english_readiness.label());
            if inputs.choice == "needs_longer" && profile.australia.accept_language_course {
                preference.push_str(", a language course is acceptable");
            }
            Facet {
                fact,
                preference,
                stated: true,
                judge: Judge::NoBurden(inputs.flag),
            }
        }
        DimensionKind::Scholarship => Facet {
            fact: yes_no(inputs.flag, "offers scholarships", "no scholarships listed"),
            preference: format!("scholarships are {}", profile.scholarship_importance.label()),
            stated: level_stated,
            judge: Judge::Flag {
                value: inputs.flag,
                strict: inputs.choice == "high",
            },
        },
        DimensionKind::StudyLength => Facet {
            fact: inputs.value.map(|y| format!("{:.1}-year degree", y)),
            preference: format!(
                "study length: {}",
                profile.australia.study_length_preference.label()
            ),
            stated: inputs.choice != "indifferent",
            judge: Judge::Ratio,
        },
        DimensionKind::Intakes => Facet {
            fact: inputs.fact.as_ref().map(|t| format!("intakes: {}", t)),
            preference: format!("starting {}", profile.intake_preference.label()),
            stated: inputs.choice != "undecided",
            judge: Judge::Flag {
                value: inputs.flag,
                strict: false,
            },
        },
        DimensionKind::UcasRoute => Facet {
            fact: inputs.fact.as_ref().map(|d| format!("UCAS deadline {}", d)),
            preference: format!("the {}", profile.united_kingdom.ucas_route.label()),
            stated: inputs.choice != "unsure",
            judge: Judge::Ratio,
        },
        DimensionKind::PlacementYear => Facet {
            fact: yes_no(inputs.flag, "offers a placement year", "no placement year"),
            preference: format!(
                "a placement year is {}",
                profile.united_kingdom.placement_year_pref.label()
            ),
            stated: inputs.choice != "not_important",
            judge: Judge::Flag {
                value: inputs.flag,
                strict: inputs.choice == "required",
            },
        },
        DimensionKind::RussellGroup => Facet {
            fact: yes_no(inputs.flag, "Russell Group member", "not a Russell Group member"),
            preference: format!(
                "Russell Group membership is {}",
                profile.united_kingdom.russell_pref.label()
            ),
            stated: level_stated,
            judge: Judge::Flag {
                value: inputs.flag,
                strict: inputs.choice == "high",
            },
        },
        DimensionKind::PersonalStatement => Facet {
            fact: Some(match inputs.value {
                Some(w) => format!("personal statement weight {:.0}/10", w),
                None => "personal statement weight not published".to_string(),
            }),
            preference: format!(
                "your application materials are {}",
                profile.united_kingdom.prep_level.readiness()
            ),
            stated: true,
            judge: Judge::Ratio,
        },
        DimensionKind::AdmissionsTests => Facet {
            fact: match (inputs.flag, inputs.fact.as_deref()) {
                (Some(true), Some(tests)) => Some(format!("requires {}", tests)),
                (Some(_), _) => Some("no admissions test".to_string()),
                (None, _) => None,
            },
            preference: format!(
                "for admissions tests you are {}",
                profile.united_kingdom.prep_level.readiness()
            ),
            stated: true,
            judge: Judge::NoBurden(inputs.flag),
        },
        DimensionKind::Orientation => {
            let mut fact = match inputs.value {
                Some(links) => format!("industry links {:.0}/10", links),
                None => "industry links not rated".to_string(),
            };
            if inputs.flag == Some(true) {
                fact.push_str(", co-op or internship required");
            }
            Facet {
                fact: Some(fact),
                preference: format!("{} programmes", profile.singapore.orientation.label()),
                stated: true,
                judge: Judge::Ratio,
            }
        }
        DimensionKind::TuitionGrant => {
            let avoid = matches!(inputs.choice, "avoid" | "refuse");
            let fact = if avoid {
                inputs.secondary_flag.map(|free| match (free, inputs.value) {
                    (true, _) => "no service bond".to_string(),
                    (false, Some(years)) => format!("{:.0}-year service bond", years),
                    (false, None) => "service bond applies".to_string(),
                })
            } else {
                yes_no(inputs.flag, "tuition grant available", "no tuition grant")
            };
            Facet {
                fact,
                preference: profile.singapore.bond_acceptance.label().to_string(),
                stated: inputs.choice != "indifferent",
                judge: Judge::Flag {
                    value: if avoid {
                        inputs.secondary_flag
                    } else {
                        inputs.flag
                    },
                    strict: avoid,
                },
            }
        }
        DimensionKind::InterviewPortfolio => Facet {
            fact: yes_no(
                inputs.flag,
                "interview or portfolio required",
                "no interview or portfolio required",
            ),
            preference: format!(
                "interviews or portfolios: you are {}",
                profile.singapore.interview_portfolio.willingness()
            ),
            stated: true,
            judge: Judge::NoBurden(inputs.flag),
        },
        DimensionKind::DoubleDegree => Facet {
            fact: yes_no(inputs.flag, "offers double-degree options", "no double-degree tag"),
            preference: "a double degree is wanted".to_string(),
            stated: inputs.choice == "wanted",
            judge: Judge::Flag {
                value: inputs.flag,
                strict: false,
            },
        },
        DimensionKind::Exchange => Facet {
            fact: inputs.value.map(|s| format!("exchange opportunities {:.0}/10", s)),
            preference: "exchange opportunities are wanted".to_string(),
            stated: inputs.choice == "wanted",
            judge: Judge::Ratio,
        },
        DimensionKind::Safety => Facet {
            fact: inputs.value.map(|s| format!("safety score {:.1}/10", s)),
            preference: format!(
                "safety and comfort are {}",
                profile.singapore.safety_importance.label()
            ),
            stated: level_stated,
            judge: Judge::Ratio,
        },
    };

    Ok(facet)
}

/// Fallback note for a candidate admitted through relaxation
fn annotation(
    rubric: &Rubric,
    scored: &ScoredCandidate<'_>,
    profile: &PreferenceProfile,
    admission: &Admission,
) -> Result<Option<Explanation>, ExplainError> {
    let (lead, relevant, verdict): (&str, Vec<&FiredRung>, Verdict) = match admission {
        Admission::Strict => return Ok(None),
        Admission::Relaxed(fired) => {
            let violated: Vec<&FiredRung> = fired
                .iter()
                .filter(|rung| violated_by(rubric, rung, scored, profile))
                .collect();
            let relevant = if violated.is_empty() {
                fired.iter().collect()
            } else {
                violated
            };
            (
                "Included after relaxing your hard requirements",
                relevant,
                Verdict::PartiallyMeets,
            )
        }
        Admission::Pool(fired) | Admission::LastResort(fired) => (
            "Included because no university met your hard requirements",
            fired.iter().collect(),
            Verdict::NotApplicable,
        ),
    };

    let labels: Vec<&str> = relevant.iter().map(|rung| rung.label.as_str()).collect();
    let mut text = String::new();
    write!(text, "{}: {}", lead, labels.join("; "))?;

    Ok(Some(Explanation {
        dimension: None,
        fact: labels.join("; "),
        preference: "all hard requirements".to_string(),
        verdict,
        text,
    }))
}

fn violated_by(
    rubric: &Rubric,
    rung: &FiredRung,
    scored: &ScoredCandidate<'_>,
    profile: &PreferenceProfile,
) -> bool {
    let key = match rung.kind {
        RelaxationKind::Dropped(key) => key,
        RelaxationKind::WidenedBudget => FilterKey::Budget,
        RelaxationKind::WidenedBand => FilterKey::AcademicBand,
        RelaxationKind::Pool | RelaxationKind::LastResort => return true,
    };
    violates(rubric, key, scored.candidate, profile)
}
