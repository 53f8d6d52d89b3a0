use async_trait::async_trait;
use std::path::Path;

use super::render::{TableRow, render_list};
use crate::controllers::{ActionOutcome, Resource, ResourceListController};

/// 导航外壳看到的列表页面
///
/// 把不同资源类型的控制器统一成可以放进 `&dyn` 的接口。
#[async_trait]
pub trait ListScreen: Send + Sync {
    fn can_mutate(&self) -> bool;
    async fn mount(&self) -> ActionOutcome;
    async fn reload(&self) -> ActionOutcome;
    async fn begin_create(&self) -> ActionOutcome;
    async fn begin_edit(&self, id: i64) -> ActionOutcome;
    async fn set_field(&self, name: &str, value: &str) -> ActionOutcome;
    async fn attach(&self, path: &Path) -> ActionOutcome;
    async fn detach(&self) -> ActionOutcome;
    async fn submit(&self) -> ActionOutcome;
    async fn cancel(&self);
    async fn request_delete(&self, id: i64) -> ActionOutcome;
    async fn confirm_delete(&self) -> ActionOutcome;
    async fn cancel_delete(&self);
    async fn render(&self, title: &str) -> String;
}

#[async_trait]
impl<R> ListScreen for ResourceListController<R>
where
    R: Resource,
    R::Record: TableRow,
{
    fn can_mutate(&self) -> bool {
        ResourceListController::can_mutate(self)
    }

    async fn mount(&self) -> ActionOutcome {
        ResourceListController::mount(self).await
    }

    async fn reload(&self) -> ActionOutcome {
        self.load().await
    }

    async fn begin_create(&self) -> ActionOutcome {
        ResourceListController::begin_create(self).await
    }

    async fn begin_edit(&self, id: i64) -> ActionOutcome {
        ResourceListController::begin_edit(self, id).await
    }

    async fn set_field(&self, name: &str, value: &str) -> ActionOutcome {
        ResourceListController::set_field(self, name, value).await
    }

    async fn attach(&self, path: &Path) -> ActionOutcome {
        self.attach_path(path).await
    }

    async fn detach(&self) -> ActionOutcome {
        self.detach_file().await
    }

    async fn submit(&self) -> ActionOutcome {
        ResourceListController::submit(self).await
    }

    async fn cancel(&self) {
        ResourceListController::cancel(self).await
    }

    async fn request_delete(&self, id: i64) -> ActionOutcome {
        ResourceListController::request_delete(self, id).await
    }

    async fn confirm_delete(&self) -> ActionOutcome {
        ResourceListController::confirm_delete(self).await
    }

    async fn cancel_delete(&self) {
        ResourceListController::cancel_delete(self).await
    }

    async fn render(&self, title: &str) -> String {
        let view = self.view().await;
        render_list(
            title,
            &view,
            self.resource().schema(),
            ResourceListController::can_mutate(self),
        )
    }
}
