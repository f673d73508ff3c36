//! UIA accessibility tree capture via `windows-rs`.
//!
//! [`capture_tree`] takes one `ElementFromHandleBuildCache(TreeScope_Subtree)`
//! round trip per window and then walks the cache without further COM
//! calls, so a deep tree costs one cross-process hop instead of thousands.

use windows::Win32::Foundation::HWND;
use windows::Win32::System::Com::{CoCreateInstance, CLSCTX_INPROC_SERVER};
use windows::Win32::UI::Accessibility::{
    CUIAutomation, IUIAutomation, IUIAutomationCacheRequest, IUIAutomationElement,
    IUIAutomationElementArray, TreeScope_Subtree, UIA_AppBarControlTypeId,
    UIA_AutomationIdPropertyId, UIA_BoundingRectanglePropertyId, UIA_ButtonControlTypeId,
    UIA_CalendarControlTypeId, UIA_CheckBoxControlTypeId, UIA_ClassNamePropertyId,
    UIA_ComboBoxControlTypeId, UIA_ControlTypePropertyId, UIA_CustomControlTypeId,
    UIA_DataGridControlTypeId, UIA_DataItemControlTypeId, UIA_DocumentControlTypeId,
    UIA_EditControlTypeId, UIA_GroupControlTypeId, UIA_HeaderControlTypeId,
    UIA_HeaderItemControlTypeId, UIA_HyperlinkControlTypeId, UIA_ImageControlTypeId,
    UIA_ListControlTypeId, UIA_ListItemControlTypeId, UIA_MenuBarControlTypeId,
    UIA_MenuControlTypeId, UIA_MenuItemControlTypeId, UIA_NamePropertyId, UIA_PaneControlTypeId,
    UIA_ProgressBarControlTypeId, UIA_RadioButtonControlTypeId, UIA_ScrollBarControlTypeId,
    UIA_SemanticZoomControlTypeId, UIA_SeparatorControlTypeId, UIA_SliderControlTypeId,
    UIA_SpinnerControlTypeId, UIA_SplitButtonControlTypeId, UIA_StatusBarControlTypeId,
    UIA_TabControlTypeId, UIA_TabItemControlTypeId, UIA_TableControlTypeId,
    UIA_TextControlTypeId, UIA_ThumbControlTypeId, UIA_TitleBarControlTypeId,
    UIA_ToolBarControlTypeId, UIA_ToolTipControlTypeId, UIA_TreeControlTypeId,
    UIA_TreeItemControlTypeId, UIA_WindowControlTypeId, UIA_CONTROLTYPE_ID,
};

use super::com::ComGuard;
use crate::errors::WinaimError;
use crate::geom::Rect;
use crate::tree::TreeNode;

// ---------------------------------------------------------------------------
// Control-type ID -> name mapping
// ---------------------------------------------------------------------------

fn control_type_name(id: UIA_CONTROLTYPE_ID) -> &'static str {
    match id {
        x if x == UIA_AppBarControlTypeId => "AppBar",
        x if x == UIA_ButtonControlTypeId => "Button",
        x if x == UIA_CalendarControlTypeId => "Calendar",
        x if x == UIA_CheckBoxControlTypeId => "CheckBox",
        x if x == UIA_ComboBoxControlTypeId => "ComboBox",
        x if x == UIA_CustomControlTypeId => "Custom",
        x if x == UIA_DataGridControlTypeId => "DataGrid",
        x if x == UIA_DataItemControlTypeId => "DataItem",
        x if x == UIA_DocumentControlTypeId => "Document",
        x if x == UIA_EditControlTypeId => "Edit",
        x if x == UIA_GroupControlTypeId => "Group",
        x if x == UIA_HeaderControlTypeId => "Header",
        x if x == UIA_HeaderItemControlTypeId => "HeaderItem",
        x if x == UIA_HyperlinkControlTypeId => "Hyperlink",
        x if x == UIA_ImageControlTypeId => "Image",
        x if x == UIA_ListControlTypeId => "List",
        x if x == UIA_ListItemControlTypeId => "ListItem",
        x if x == UIA_MenuBarControlTypeId => "MenuBar",
        x if x == UIA_MenuControlTypeId => "Menu",
        x if x == UIA_MenuItemControlTypeId => "MenuItem",
        x if x == UIA_PaneControlTypeId => "Pane",
        x if x == UIA_ProgressBarControlTypeId => "ProgressBar",
        x if x == UIA_RadioButtonControlTypeId => "RadioButton",
        x if x == UIA_ScrollBarControlTypeId => "ScrollBar",
        x if x == UIA_SemanticZoomControlTypeId => "SemanticZoom",
        x if x == UIA_SeparatorControlTypeId => "Separator",
        x if x == UIA_SliderControlTypeId => "Slider",
        x if x == UIA_SpinnerControlTypeId => "Spinner",
        x if x == UIA_SplitButtonControlTypeId => "SplitButton",
        x if x == UIA_StatusBarControlTypeId => "StatusBar",
        x if x == UIA_TabControlTypeId => "Tab",
        x if x == UIA_TabItemControlTypeId => "TabItem",
        x if x == UIA_TableControlTypeId => "Table",
        x if x == UIA_TextControlTypeId => "Text",
        x if x == UIA_ThumbControlTypeId => "Thumb",
        x if x == UIA_TitleBarControlTypeId => "TitleBar",
        x if x == UIA_ToolBarControlTypeId => "ToolBar",
        x if x == UIA_ToolTipControlTypeId => "ToolTip",
        x if x == UIA_TreeControlTypeId => "Tree",
        x if x == UIA_TreeItemControlTypeId => "TreeItem",
        x if x == UIA_WindowControlTypeId => "Window",
        _ => "Unknown",
    }
}

// ---------------------------------------------------------------------------
// Cache request builder
// ---------------------------------------------------------------------------

unsafe fn build_cache_request(uia: &IUIAutomation) -> Result<IUIAutomationCacheRequest, WinaimError> {
    let request = uia
        .CreateCacheRequest()
        .map_err(|e| WinaimError::ComError(format!("CreateCacheRequest: {e}")))?;

    request
        .SetTreeScope(TreeScope_Subtree)
        .map_err(|e| WinaimError::ComError(format!("SetTreeScope: {e}")))?;

    let properties = [
        UIA_NamePropertyId,
        UIA_AutomationIdPropertyId,
        UIA_ControlTypePropertyId,
        UIA_ClassNamePropertyId,
        UIA_BoundingRectanglePropertyId,
    ];
    for property in properties {
        request
            .AddProperty(property)
            .map_err(|e| WinaimError::ComError(format!("AddProperty({property:?}): {e}")))?;
    }

    Ok(request)
}

// ---------------------------------------------------------------------------
// Recursive tree walker
// ---------------------------------------------------------------------------

macro_rules! bstr_or_empty {
    ($expr:expr) => {
        unsafe { $expr }
            .map(|b: windows::core::BSTR| b.to_string())
            .unwrap_or_default()
    };
}

/// Maximum children per node to prevent memory exhaustion on pathological
/// trees (e.g. a grid with 100k cells).
const MAX_CHILDREN_PER_NODE: i32 = 512;

unsafe fn walk_element(element: &IUIAutomationElement, depth: usize) -> TreeNode {
    let name = bstr_or_empty!(element.CachedName());
    let automation_id = bstr_or_empty!(element.CachedAutomationId());
    let class_name = bstr_or_empty!(element.CachedClassName());

    let control_type = element
        .CachedControlType()
        .map(|id| control_type_name(id).to_owned())
        .unwrap_or_else(|_| "Unknown".to_owned());

    let rect = element
        .CachedBoundingRectangle()
        .map(|r| Rect::new(r.left, r.top, r.right, r.bottom))
        .unwrap_or(Rect::new(0, 0, 0, 0));

    let children = collect_children(element, depth);

    TreeNode {
        name,
        control_type,
        class_name,
        automation_id,
        rect,
        depth,
        children,
    }
}

unsafe fn collect_children(parent: &IUIAutomationElement, depth: usize) -> Vec<TreeNode> {
    let array: IUIAutomationElementArray = match parent.GetCachedChildren() {
        Ok(array) => array,
        Err(_) => return Vec::new(),
    };

    let len = match array.Length() {
        Ok(n) if n > 0 => n.min(MAX_CHILDREN_PER_NODE),
        _ => return Vec::new(),
    };

    let mut children = Vec::with_capacity(len as usize);
    for i in 0..len {
        if let Ok(child) = array.GetElement(i) {
            children.push(walk_element(&child, depth + 1));
        }
    }
    children
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Capture the full accessibility tree of one window as an owned
/// [`TreeNode`].
pub fn capture_tree(handle: isize) -> Result<TreeNode, WinaimError> {
    let _com = ComGuard::init()?;

    let uia: IUIAutomation = unsafe { CoCreateInstance(&CUIAutomation, None, CLSCTX_INPROC_SERVER)? };

    let request = unsafe { build_cache_request(&uia)? };

    let root: IUIAutomationElement = unsafe {
        uia.ElementFromHandleBuildCache(HWND(handle as *mut core::ffi::c_void), &request)
            .map_err(|e| WinaimError::TreeError(format!("ElementFromHandleBuildCache({handle}): {e}")))?
    };

    Ok(unsafe { walk_element(&root, 0) })
}
