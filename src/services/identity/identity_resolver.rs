//! # 외부 식별 정보 해석 서비스
//!
//! 검증된 외부 프로필을 로컬 사용자에 연결합니다.
//!
//! ## 흐름
//!
//! ```text
//! resolve_login(profile)
//!   ├─ 링크 있음 ────────────────► 링크의 사용자 반환
//!   ├─ 링크 없음 + 자동 가입 허용 ─► 사용자 + 링크 생성 (트랜잭션)
//!   └─ 링크 없음 + 자동 가입 거부 ─► AutoRegisterDisabled
//!
//! resolve_attach(profile, current_user)
//!   ├─ 링크 없음 ─► 새 링크를 current_user에 연결
//!   └─ 링크 있음 ─► 소유자를 current_user로 재지정 + 캐시 필드 갱신
//! ```
//!
//! 동시 가입 경합은 저장소의 유니크 제약으로 판정되며, 진 쪽은 로그인 조회를 다시 수행합니다.

use std::sync::Arc;
use crate::{
    core::errors::{AppError, AppResult},
    domain::{
        entities::{identity::IdentityLink, users::{Group, User}},
        models::oauth::ExternalProfile,
    },
    repositories::{IdentityLinkRepository, IdentityStore, UserRepository},
    utils::token::generate_unique_token,
};

/// 자동 가입 사용자의 로그인명 접두사
const GENERATED_LOGIN_PREFIX: &str = "user";

/// 외부 식별 정보 → 로컬 사용자 해석기
///
/// 프로세스 전역 상태를 갖지 않으며, 저장소와 설정은 생성 시 주입됩니다.
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn IdentityStore>,
    allow_auto_register: bool,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn IdentityStore>, allow_auto_register: bool) -> Self {
        Self { store, allow_auto_register }
    }

    /// 외부 로그인에 대응하는 로컬 사용자를 찾거나 자동 가입시킵니다.
    ///
    /// 기존 링크의 캐시 필드는 갱신하지 않습니다.
    ///
    /// # Errors
    ///
    /// * `InvalidExternalProfile` - provider 또는 external_id 누락
    /// * `AutoRegisterDisabled` - 링크가 없고 자동 가입이 꺼져 있음
    /// * `MissingDefaultGroup` - 기본 그룹 `Users` 없음
    /// * `PersistenceFailure` - 저장소 실패 또는 링크가 가리키는 사용자 없음
    pub async fn resolve_login(&self, profile: &ExternalProfile) -> AppResult<User> {
        profile.validate()?;

        if let Some(user) = self.find_linked_user(profile).await? {
            return Ok(user);
        }

        if !self.allow_auto_register {
            log::warn!(
                "자동 가입 거부: provider={}, external_id={}",
                profile.provider, profile.external_id
            );
            return Err(AppError::AutoRegisterDisabled);
        }

        match self.register(profile).await {
            Ok(user) => Ok(user),
            Err(AppError::DuplicateIdentity { provider, external_id }) => {
                log::warn!(
                    "동시 가입 경합 감지, 기존 링크로 재해석: provider={}, external_id={}",
                    provider, external_id
                );
                self.find_linked_user(profile).await?.ok_or_else(|| {
                    AppError::PersistenceFailure(format!(
                        "중복 링크 이후에도 {}:{} 링크를 찾을 수 없음",
                        provider, external_id
                    ))
                })
            }
            Err(e) => Err(e),
        }
    }

    /// 외부 계정을 현재 로그인한 사용자에 연결합니다.
    ///
    /// 링크가 이미 다른 사용자에 속해 있어도 소유자를 `current_user`로 덮어씁니다 (last-write-wins).
    pub async fn resolve_attach(&self, profile: &ExternalProfile, current_user: &User) -> AppResult<IdentityLink> {
        profile.validate()?;

        match self.attach_once(profile, current_user).await {
            Err(AppError::DuplicateIdentity { .. }) => {
                // 첫 attach 경합에서 진 경우, 이제 존재하는 링크를 대상으로 한 번만 재시도
                log::warn!(
                    "attach 경합 감지, 재시도: provider={}, external_id={}",
                    profile.provider, profile.external_id
                );
                self.attach_once(profile, current_user).await
            }
            result => result,
        }
    }

    async fn attach_once(&self, profile: &ExternalProfile, current_user: &User) -> AppResult<IdentityLink> {
        let link = match self
            .store
            .find_by_provider_and_id(&profile.provider, &profile.external_id)
            .await?
        {
            Some(mut link) => {
                if let Some(previous) = link.assign_owner(current_user.id) {
                    log::warn!(
                        "외부 계정 소유자 변경: provider={}, external_id={}, {} -> {}",
                        link.provider, link.external_id, previous.to_hex(), current_user.id_string()
                    );
                }
                link.refresh_from(profile);
                link
            }
            None => IdentityLink::new(profile, current_user.id),
        };

        IdentityLinkRepository::save(self.store.as_ref(), &link).await?;

        log::info!(
            "외부 계정 연결: provider={}, external_id={}, user={}",
            link.provider, link.external_id, current_user.id_string()
        );
        Ok(link)
    }

    async fn find_linked_user(&self, profile: &ExternalProfile) -> AppResult<Option<User>> {
        let Some(link) = self
            .store
            .find_by_provider_and_id(&profile.provider, &profile.external_id)
            .await?
        else {
            return Ok(None);
        };

        match self.store.find_by_id(&link.user_id).await? {
            Some(user) => Ok(Some(user)),
            None => Err(AppError::PersistenceFailure(format!(
                "링크 {}:{}의 사용자 {}가 존재하지 않음",
                link.provider, link.external_id, link.user_id.to_hex()
            ))),
        }
    }

    /// 새 로컬 사용자와 링크를 하나의 작업 단위로 저장합니다.
    ///
    /// 기본 그룹이 없으면 아무것도 저장하지 않습니다.
    async fn register(&self, profile: &ExternalProfile) -> AppResult<User> {
        let group = self
            .store
            .find_group_by_name(Group::DEFAULT_NAME)
            .await?
            .ok_or_else(|| AppError::MissingDefaultGroup(Group::DEFAULT_NAME.to_string()))?;

        let user = User::new_federated(
            generate_unique_token(GENERATED_LOGIN_PREFIX),
            profile.user_name_or_generated(),
            profile.email.clone(),
            &group,
        );
        let link = IdentityLink::new(profile, user.id);

        self.store.save_registration(&user, &link).await?;

        log::info!(
            "외부 계정 자동 가입: provider={}, external_id={}, user={}",
            profile.provider, profile.external_id, user.id_string()
        );
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures_util::future::join;
    use mongodb::bson::oid::ObjectId;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::task::{Context, Poll};
    use crate::repositories::memory::InMemoryIdentityStore;

    fn profile(external_id: &str) -> ExternalProfile {
        ExternalProfile::new("google", external_id).unwrap()
    }

    fn resolver(store: Arc<InMemoryIdentityStore>, allow_auto_register: bool) -> IdentityResolver {
        IdentityResolver::new(store, allow_auto_register)
    }

    async fn local_user(store: &InMemoryIdentityStore, login: &str) -> User {
        let group = store.find_group_by_name(Group::DEFAULT_NAME).await.unwrap().unwrap();
        let user = User::new_federated(login.to_string(), login.to_string(), None, &group);
        UserRepository::save(store, &user).await.unwrap();
        user
    }

    /// 첫 링크 조회에서 "없음"을 한 번 보게 만드는 저장소.
    /// 다른 요청이 조회와 저장 사이에 먼저 가입을 끝낸 상황을 재현합니다.
    struct StaleFirstRead {
        inner: Arc<InMemoryIdentityStore>,
        stale: AtomicBool,
    }

    #[async_trait]
    impl IdentityLinkRepository for StaleFirstRead {
        async fn find_by_provider_and_id(&self, provider: &str, external_id: &str) -> AppResult<Option<IdentityLink>> {
            if self.stale.swap(false, Ordering::SeqCst) {
                return Ok(None);
            }
            self.inner.find_by_provider_and_id(provider, external_id).await
        }

        async fn save(&self, link: &IdentityLink) -> AppResult<()> {
            IdentityLinkRepository::save(self.inner.as_ref(), link).await
        }
    }

    #[async_trait]
    impl UserRepository for StaleFirstRead {
        async fn find_group_by_name(&self, name: &str) -> AppResult<Option<Group>> {
            self.inner.find_group_by_name(name).await
        }

        async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
            self.inner.find_by_id(id).await
        }

        async fn save(&self, user: &User) -> AppResult<()> {
            UserRepository::save(self.inner.as_ref(), user).await
        }
    }

    #[async_trait]
    impl IdentityStore for StaleFirstRead {
        async fn save_registration(&self, user: &User, link: &IdentityLink) -> AppResult<()> {
            self.inner.save_registration(user, link).await
        }
    }

    /// 한 번 `Pending`을 돌려주고 깨어나는 future
    struct YieldNow(bool);

    impl Future for YieldNow {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                return Poll::Ready(());
            }
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }

    /// 링크 조회 직후 실행을 양보하는 저장소.
    /// `join`으로 묶인 두 로그인이 모두 "링크 없음"을 본 뒤 가입을 시도하게 됩니다.
    struct YieldAfterLookup {
        inner: Arc<InMemoryIdentityStore>,
        registrations: AtomicUsize,
    }

    #[async_trait]
    impl IdentityLinkRepository for YieldAfterLookup {
        async fn find_by_provider_and_id(&self, provider: &str, external_id: &str) -> AppResult<Option<IdentityLink>> {
            let found = self.inner.find_by_provider_and_id(provider, external_id).await;
            YieldNow(false).await;
            found
        }

        async fn save(&self, link: &IdentityLink) -> AppResult<()> {
            IdentityLinkRepository::save(self.inner.as_ref(), link).await
        }
    }

    #[async_trait]
    impl UserRepository for YieldAfterLookup {
        async fn find_group_by_name(&self, name: &str) -> AppResult<Option<Group>> {
            self.inner.find_group_by_name(name).await
        }

        async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
            self.inner.find_by_id(id).await
        }

        async fn save(&self, user: &User) -> AppResult<()> {
            UserRepository::save(self.inner.as_ref(), user).await
        }
    }

    #[async_trait]
    impl IdentityStore for YieldAfterLookup {
        async fn save_registration(&self, user: &User, link: &IdentityLink) -> AppResult<()> {
            self.registrations.fetch_add(1, Ordering::SeqCst);
            self.inner.save_registration(user, link).await
        }
    }

    #[actix_web::test]
    async fn test_unknown_profile_with_auto_register_disabled() {
        let store = Arc::new(InMemoryIdentityStore::with_default_group());
        let resolver = resolver(store.clone(), false);

        let result = resolver.resolve_login(&profile("id1")).await;

        assert!(matches!(result, Err(AppError::AutoRegisterDisabled)));
        assert!(store.users().is_empty());
        assert!(store.links().is_empty());
    }

    #[actix_web::test]
    async fn test_auto_register_then_plain_login() {
        let store = Arc::new(InMemoryIdentityStore::with_default_group());
        let resolver = resolver(store.clone(), true);
        let profile = profile("id1")
            .with_display_name(Some("Alice".to_string()))
            .with_email(Some("e@x.com".to_string()));

        let registered = resolver.resolve_login(&profile).await.unwrap();
        let again = resolver.resolve_login(&profile).await.unwrap();

        assert_eq!(registered.id, again.id);
        assert_eq!(store.users().len(), 1);
        assert_eq!(store.links().len(), 1);

        assert_eq!(registered.display_name, "Alice");
        assert_eq!(registered.email.as_deref(), Some("e@x.com"));
        assert!(registered.login.starts_with(GENERATED_LOGIN_PREFIX));
        assert!(!registered.can_authenticate_with_password());

        let link = &store.links()[0];
        assert_eq!(link.user_id, registered.id);
        assert_eq!(link.display_name, "Alice");
    }

    #[actix_web::test]
    async fn test_registration_without_display_name_uses_generated_name() {
        let store = Arc::new(InMemoryIdentityStore::with_default_group());
        let resolver = resolver(store.clone(), true);
        let profile = profile("id1")
            .with_email_verified(Some("v@x.com".to_string()))
            .with_email(Some("e@x.com".to_string()));

        let user = resolver.resolve_login(&profile).await.unwrap();

        assert!(user.display_name.starts_with("google"));
        assert!(!user.display_name.contains("id1"));
        assert_eq!(store.links()[0].display_name, "v@x.com");
    }

    #[actix_web::test]
    async fn test_missing_default_group_persists_nothing() {
        let store = Arc::new(InMemoryIdentityStore::new());
        let resolver = resolver(store.clone(), true);

        let result = resolver.resolve_login(&profile("id1")).await;

        assert!(matches!(result, Err(AppError::MissingDefaultGroup(name)) if name == Group::DEFAULT_NAME));
        assert!(store.users().is_empty());
        assert!(store.links().is_empty());
    }

    #[actix_web::test]
    async fn test_invalid_profile_is_rejected_before_persistence() {
        let store = Arc::new(InMemoryIdentityStore::with_default_group());
        let resolver = resolver(store.clone(), true);
        let mut profile = profile("id1");
        profile.external_id = "  ".to_string();

        let result = resolver.resolve_login(&profile).await;

        assert!(matches!(result, Err(AppError::InvalidExternalProfile(_))));
        assert!(store.users().is_empty());
    }

    #[actix_web::test]
    async fn test_link_to_missing_user_is_persistence_failure() {
        let store = Arc::new(InMemoryIdentityStore::with_default_group());
        let orphan = IdentityLink::new(&profile("id1"), ObjectId::new());
        IdentityLinkRepository::save(store.as_ref(), &orphan).await.unwrap();

        let result = resolver(store, true).resolve_login(&profile("id1")).await;

        assert!(matches!(result, Err(AppError::PersistenceFailure(_))));
    }

    #[actix_web::test]
    async fn test_duplicate_registration_recovers_to_winner() {
        let inner = Arc::new(InMemoryIdentityStore::with_default_group());
        let winner = resolver(inner.clone(), true).resolve_login(&profile("id1")).await.unwrap();

        let racing = Arc::new(StaleFirstRead { inner: inner.clone(), stale: AtomicBool::new(true) });
        let loser = IdentityResolver::new(racing, true)
            .resolve_login(&profile("id1"))
            .await
            .unwrap();

        assert_eq!(loser.id, winner.id);
        assert_eq!(inner.users().len(), 1);
        assert_eq!(inner.links().len(), 1);
    }

    #[actix_web::test]
    async fn test_interleaved_registration_creates_one_user() {
        let inner = Arc::new(InMemoryIdentityStore::with_default_group());
        let store = Arc::new(YieldAfterLookup { inner: inner.clone(), registrations: AtomicUsize::new(0) });
        let resolver = IdentityResolver::new(store.clone(), true);
        let profile = profile("id1");

        let (first, second) = join(resolver.resolve_login(&profile), resolver.resolve_login(&profile)).await;

        assert_eq!(first.unwrap().id, second.unwrap().id);
        assert_eq!(store.registrations.load(Ordering::SeqCst), 2);
        assert_eq!(inner.users().len(), 1);
        assert_eq!(inner.links().len(), 1);
    }

    #[actix_web::test]
    async fn test_attach_twice_reassigns_owner() {
        let store = Arc::new(InMemoryIdentityStore::with_default_group());
        let resolver = resolver(store.clone(), false);
        let first = local_user(&store, "first").await;
        let second = local_user(&store, "second").await;

        resolver.resolve_attach(&profile("id1"), &first).await.unwrap();
        let link = resolver.resolve_attach(&profile("id1"), &second).await.unwrap();

        assert_eq!(link.user_id, second.id);
        let stored = store.find_by_provider_and_id("google", "id1").await.unwrap().unwrap();
        assert_eq!(stored.user_id, second.id);
        assert_eq!(store.links().len(), 1);
    }

    #[actix_web::test]
    async fn test_attach_refreshes_cached_fields() {
        let store = Arc::new(InMemoryIdentityStore::with_default_group());
        let resolver = resolver(store.clone(), false);
        let user = local_user(&store, "owner").await;

        resolver.resolve_attach(&profile("id1"), &user).await.unwrap();
        let updated = profile("id1")
            .with_display_name(Some("Alice".to_string()))
            .with_photo_url(Some("https://img/a.png".to_string()))
            .with_profile_url(Some("https://p/a".to_string()));
        resolver.resolve_attach(&updated, &user).await.unwrap();

        let stored = store.find_by_provider_and_id("google", "id1").await.unwrap().unwrap();
        assert_eq!(stored.display_name, "Alice");
        assert_eq!(stored.avatar_url.as_deref(), Some("https://img/a.png"));
        assert_eq!(stored.profile_url.as_deref(), Some("https://p/a"));
    }

    #[actix_web::test]
    async fn test_plain_login_does_not_refresh_link() {
        let store = Arc::new(InMemoryIdentityStore::with_default_group());
        let resolver = resolver(store.clone(), true);

        resolver.resolve_login(&profile("id1")).await.unwrap();
        let renamed = profile("id1").with_display_name(Some("Renamed".to_string()));
        resolver.resolve_login(&renamed).await.unwrap();

        assert_eq!(store.links()[0].display_name, "id1");
    }
}
