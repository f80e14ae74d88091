use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use triage_core::{ProfileStore, UserProfile};

/// 사용자별 프로필을 `<dir>/<user>.json`으로 보관하는 저장소.
pub struct JsonFileProfileStore {
    dir: PathBuf,
}

#[derive(Serialize, Deserialize)]
struct StoredProfile {
    profile: UserProfile,
    updated_at: DateTime<Utc>,
}

impl JsonFileProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> io::Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("사용자 이름은 영문, 숫자, '-', '_'만 쓸 수 있습니다: {key:?}"),
            ));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    /// 마지막 저장 시각. 저장된 적이 없으면 `None`.
    pub fn updated_at(&self, key: &str) -> io::Result<Option<DateTime<Utc>>> {
        Ok(self.read(key)?.map(|stored| stored.updated_at))
    }

    fn read(&self, key: &str) -> io::Result<Option<StoredProfile>> {
        let path = self.path_for(key)?;
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        };
        Ok(Some(serde_json::from_str(&data)?))
    }
}

impl ProfileStore for JsonFileProfileStore {
    type Error = io::Error;

    fn load(&self, key: &str) -> io::Result<Option<UserProfile>> {
        Ok(self.read(key)?.map(|stored| stored.profile))
    }

    fn save(&self, key: &str, profile: &UserProfile) -> io::Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let stored = StoredProfile {
            profile: profile.clone(),
            updated_at: Utc::now(),
        };
        // 임시 파일에 쓴 뒤 이름을 바꿔 반쯤 쓰인 파일이 남지 않게 한다.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&stored)?)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!(path = %path.display(), "profile saved");
        Ok(())
    }
}
