use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use triage_core::intake::ChecklistSelection;
use triage_core::{
    analyze, AnalysisRequest, ClassifierKind, ProfileList, ProfileStore, TriageEngine,
    UserProfile,
};
use triage_remote::classifier_from_config;

mod settings;
mod store;

use settings::{Settings, API_KEY_ENV};
use store::JsonFileProfileStore;

#[derive(Parser, Debug)]
#[command(
    name = "triage-cli",
    about = "증상 문장으로 위험도와 일반의약품 추천을 JSON으로 출력합니다."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 증상을 분석한다.
    Analyze(AnalyzeArgs),
    /// 저장된 건강 프로필을 보거나 고친다.
    Profile {
        #[command(flatten)]
        target: ProfileTarget,
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Args, Debug)]
struct ProfileTarget {
    /// 프로필 저장 디렉터리.
    #[arg(long, default_value = ".triage/profiles")]
    profile_dir: PathBuf,
    /// 프로필 사용자 이름.
    #[arg(long, default_value = "default")]
    user: String,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// 증상 문장.
    #[arg(short, long, conflicts_with_all = ["request", "checklist"])]
    symptoms: Option<String>,
    /// `{ "symptoms": ..., "userProfile": ... }` 형식의 요청 JSON 파일.
    #[arg(short, long, conflicts_with = "checklist")]
    request: Option<PathBuf>,
    /// 체크리스트 항목 `분류/증상` (예: `digestive/설사`). 여러 번 줄 수 있다.
    #[arg(long)]
    checklist: Vec<String>,
    /// JSON 설정 파일.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// 생성형 모델 분석을 사용한다 (GEMINI_API_KEY 필요).
    #[arg(long)]
    remote: bool,
    /// 요청에 프로필이 없으면 저장된 프로필을 쓴다.
    #[arg(long)]
    use_profile: bool,
    #[command(flatten)]
    target: ProfileTarget,
    /// 들여쓰기 없이 한 줄로 출력한다.
    #[arg(long)]
    compact: bool,
}

#[derive(Subcommand, Debug)]
enum ProfileAction {
    /// 프로필을 출력한다.
    Show,
    /// 목록에 항목을 추가한다.
    Add { list: ListArg, value: String },
    /// 목록에서 항목을 지운다.
    Remove { list: ListArg, value: String },
    /// 키와 몸무게를 설정한다.
    Set {
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long, conflicts_with = "height")]
        clear_height: bool,
        #[arg(long, conflicts_with = "weight")]
        clear_weight: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ListArg {
    Allergies,
    Conditions,
    Medications,
}

impl From<ListArg> for ProfileList {
    fn from(arg: ListArg) -> Self {
        match arg {
            ListArg::Allergies => ProfileList::Allergies,
            ListArg::Conditions => ProfileList::Conditions,
            ListArg::Medications => ProfileList::Medications,
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // stdout은 JSON 결과 전용이다.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("triage=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let output = match cli.command {
        Command::Analyze(args) => run_analyze(args)?,
        Command::Profile { target, action } => run_profile(target, action)?,
    };
    println!("{output}");
    Ok(())
}

fn run_analyze(args: AnalyzeArgs) -> anyhow::Result<String> {
    let mut settings = Settings::load(args.config.as_deref())?;
    settings.apply_env_key(std::env::var(API_KEY_ENV).ok());
    if args.remote {
        settings.triage.classifier = ClassifierKind::RemoteModel;
    }

    let mut request = build_request(&args)?;
    if args.use_profile && request.user_profile.is_none() {
        let store = JsonFileProfileStore::new(&args.target.profile_dir);
        request.user_profile = Some(
            store
                .load_or_default(&args.target.user)
                .with_context(|| format!("프로필을 읽을 수 없습니다: {}", args.target.user))?,
        );
    }

    let engine = Arc::new(TriageEngine::from_config(&settings.triage)?);
    let classifier = classifier_from_config(&settings.triage, &settings.remote, engine)
        .context("분석 방식을 준비할 수 없습니다")?;
    let recommendation = analyze(classifier.as_ref(), &request)?;

    tracing::info!(
        level = recommendation.risk_assessment.level.as_str(),
        emergency = recommendation.is_emergency(),
        "analysis finished"
    );

    let json = if args.compact {
        serde_json::to_string(&recommendation)?
    } else {
        serde_json::to_string_pretty(&recommendation)?
    };
    Ok(json)
}

fn build_request(args: &AnalyzeArgs) -> anyhow::Result<AnalysisRequest> {
    if let Some(path) = &args.request {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("요청 파일을 읽을 수 없습니다: {}", path.display()))?;
        return Ok(AnalysisRequest::from_json_str(&data)?);
    }
    if !args.checklist.is_empty() {
        let symptoms = compose_checklist(&args.checklist)?;
        return Ok(AnalysisRequest::new(symptoms, None));
    }
    match &args.symptoms {
        Some(symptoms) => Ok(AnalysisRequest::new(symptoms.clone(), None)),
        None => bail!("--symptoms, --request, --checklist 중 하나가 필요합니다"),
    }
}

fn compose_checklist(items: &[String]) -> anyhow::Result<String> {
    let mut selection = ChecklistSelection::new();
    for item in items {
        let Some((category, symptom)) = item.split_once('/') else {
            bail!("체크리스트 항목은 `분류/증상` 형식이어야 합니다: {item}");
        };
        let (category, symptom) = (category.trim(), symptom.trim());
        if !selection.is_selected(category, symptom) {
            selection.toggle(category, symptom)?;
        }
    }
    selection
        .compose()
        .context("선택된 체크리스트 항목이 없습니다")
}

fn run_profile(target: ProfileTarget, action: ProfileAction) -> anyhow::Result<String> {
    let store = JsonFileProfileStore::new(&target.profile_dir);
    let mut profile = store
        .load_or_default(&target.user)
        .with_context(|| format!("프로필을 읽을 수 없습니다: {}", target.user))?;

    if apply_profile_action(&mut profile, &action)? {
        store
            .save(&target.user, &profile)
            .with_context(|| format!("프로필을 저장할 수 없습니다: {}", target.user))?;
    }
    Ok(serde_json::to_string_pretty(&profile)?)
}

/// 프로필이 바뀌었으면 `true`.
fn apply_profile_action(profile: &mut UserProfile, action: &ProfileAction) -> anyhow::Result<bool> {
    let changed = match action {
        ProfileAction::Show => false,
        ProfileAction::Add { list, value } => {
            let added = profile.add((*list).into(), value);
            if !added {
                tracing::info!("item is blank or already present, profile unchanged");
            }
            added
        }
        ProfileAction::Remove { list, value } => {
            let removed = profile.remove((*list).into(), value);
            if !removed {
                tracing::info!("item not found, profile unchanged");
            }
            removed
        }
        ProfileAction::Set {
            height,
            weight,
            clear_height,
            clear_weight,
        } => {
            let before = profile.clone();
            if *clear_height {
                profile.set_height(None)?;
            } else if height.is_some() {
                profile.set_height(*height)?;
            }
            if *clear_weight {
                profile.set_weight(None)?;
            } else if weight.is_some() {
                profile.set_weight(*weight)?;
            }
            *profile != before
        }
    };
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn checklist_items_are_composed() {
        let text = compose_checklist(&["digestive/설사".into(), "respiratory / 기침".into()]).unwrap();
        assert_eq!(text, "다음 증상들이 있습니다: 기침, 설사");
        assert!(compose_checklist(&["설사".into()]).is_err());
        assert!(compose_checklist(&["skin/기침".into()]).is_err());
    }

    #[test]
    fn request_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.json");
        std::fs::write(
            &path,
            r#"{ "symptoms": "머리가 아프다", "userProfile": { "allergies": ["아세트아미노펜"] } }"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from(["triage-cli", "analyze", "--request", path.to_str().unwrap()])
            .unwrap();
        let Command::Analyze(args) = cli.command else {
            panic!("analyze 명령이어야 합니다");
        };
        let request = build_request(&args).unwrap();
        assert_eq!(request.profile().allergies, vec!["아세트아미노펜".to_string()]);
    }

    #[test]
    fn analyze_uses_stored_profile() {
        let dir = tempfile::tempdir().unwrap();
        let mut profile = UserProfile::default();
        profile.add_allergy("아세트아미노펜");
        JsonFileProfileStore::new(dir.path()).save("kim", &profile).unwrap();

        let cli = Cli::try_parse_from([
            "triage-cli",
            "analyze",
            "--symptoms",
            "머리가 아프다",
            "--use-profile",
            "--profile-dir",
            dir.path().to_str().unwrap(),
            "--user",
            "kim",
        ])
        .unwrap();
        let Command::Analyze(args) = cli.command else {
            panic!("analyze 명령이어야 합니다");
        };

        let output: serde_json::Value = serde_json::from_str(&run_analyze(args).unwrap()).unwrap();
        assert_eq!(output["disease"], "긴장성 두통");
        let names: Vec<&str> = output["medicines"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|m| m["name"].as_str())
            .collect();
        assert_eq!(names, vec!["낙센"]);
    }

    #[test]
    fn profile_actions_report_changes() {
        let mut profile = UserProfile::default();
        let add = ProfileAction::Add {
            list: ListArg::Allergies,
            value: "아스피린".into(),
        };
        assert!(apply_profile_action(&mut profile, &add).unwrap());
        assert!(!apply_profile_action(&mut profile, &add).unwrap());

        let set = ProfileAction::Set {
            height: Some(180.0),
            weight: None,
            clear_height: false,
            clear_weight: false,
        };
        assert!(apply_profile_action(&mut profile, &set).unwrap());
        assert!(!apply_profile_action(&mut profile, &set).unwrap());

        let bad = ProfileAction::Set {
            height: None,
            weight: Some(0.0),
            clear_height: false,
            clear_weight: false,
        };
        assert!(apply_profile_action(&mut profile, &bad).is_err());
        assert!(!apply_profile_action(&mut profile, &ProfileAction::Show).unwrap());
    }

    #[test]
    fn profile_command_persists_edits() {
        let dir = tempfile::tempdir().unwrap();
        let target = ProfileTarget {
            profile_dir: dir.path().to_path_buf(),
            user: "lee".into(),
        };
        run_profile(
            target,
            ProfileAction::Add {
                list: ListArg::Medications,
                value: "와파린".into(),
            },
        )
        .unwrap();

        let stored = JsonFileProfileStore::new(dir.path()).load("lee").unwrap().unwrap();
        assert_eq!(stored.medications, vec!["와파린".to_string()]);
    }
}
