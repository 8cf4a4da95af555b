use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {TableWrapper, div, "relative w-full overflow-x-auto rounded-md border"}
    clx! {Table, table, "w-full caption-bottom text-sm"}
    clx! {TableHeader, thead, "bg-muted/40 [&_tr]:border-b"}
    clx! {TableBody, tbody, "[&_tr:last-child]:border-0 [&_tr:nth-child(even)]:bg-muted/20"}
    clx! {TableRow, tr, "border-b transition-colors hover:bg-muted/50"}
    clx! {TableHead, th, "h-10 px-2 text-left align-middle font-medium whitespace-nowrap text-foreground"}
    clx! {TableCell, td, "p-2 align-middle"}
}

pub use components::*;
